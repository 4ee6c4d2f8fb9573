//! Join plan declarations.

/// One foreign-key field to expand, with an optional nested plan applied to
/// the fetched record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinSpec {
    /// The foreign-key field to expand.
    pub field: String,
    /// Plan applied to the referenced record after substitution.
    pub nested: JoinPlan,
}

impl JoinSpec {
    /// Expand a field with no nested joins.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            field: name.into(),
            nested: JoinPlan::default(),
        }
    }

    /// Expand a field and recurse into the referenced record.
    pub fn nested(name: impl Into<String>, nested: JoinPlan) -> Self {
        Self {
            field: name.into(),
            nested,
        }
    }
}

/// An ordered list of foreign-key expansions.
///
/// An empty plan leaves every reference as a raw identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinPlan {
    /// The expansions, in declaration order.
    pub joins: Vec<JoinSpec>,
}

impl JoinPlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single-level expansion.
    pub fn expand(mut self, field: impl Into<String>) -> Self {
        self.joins.push(JoinSpec::field(field));
        self
    }

    /// Add an expansion with a nested plan.
    pub fn expand_with(mut self, field: impl Into<String>, nested: JoinPlan) -> Self {
        self.joins.push(JoinSpec::nested(field, nested));
        self
    }

    /// Check if the plan requests no expansions.
    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    /// Find the spec for a field, if requested.
    pub fn spec_for(&self, field: &str) -> Option<&JoinSpec> {
        self.joins.iter().find(|s| s.field == field)
    }
}
