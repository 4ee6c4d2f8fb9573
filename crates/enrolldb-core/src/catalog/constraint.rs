//! Constraint definitions for entities.

/// A constraint definition.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintDef {
    /// Uniqueness constraint (single or compound).
    Unique {
        /// Constraint name.
        name: String,
        /// Fields that must be unique together.
        fields: Vec<String>,
    },
    /// Inclusive integer range constraint.
    Range {
        /// Constraint name.
        name: String,
        /// Field this constraint applies to.
        field: String,
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
    },
}

impl ConstraintDef {
    /// Create a unique constraint on a single field.
    pub fn unique(name: impl Into<String>, field: impl Into<String>) -> Self {
        ConstraintDef::Unique {
            name: name.into(),
            fields: vec![field.into()],
        }
    }

    /// Create a compound unique constraint.
    pub fn unique_compound(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        ConstraintDef::Unique {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an inclusive range constraint.
    pub fn range(name: impl Into<String>, field: impl Into<String>, min: i64, max: i64) -> Self {
        ConstraintDef::Range {
            name: name.into(),
            field: field.into(),
            min,
            max,
        }
    }

    /// Create a range constraint requiring a positive value.
    pub fn positive(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::range(name, field, 1, i64::MAX)
    }

    /// Get the constraint name.
    pub fn name(&self) -> &str {
        match self {
            ConstraintDef::Unique { name, .. } => name,
            ConstraintDef::Range { name, .. } => name,
        }
    }

    /// Check if this is a unique constraint.
    pub fn is_unique(&self) -> bool {
        matches!(self, ConstraintDef::Unique { .. })
    }
}
