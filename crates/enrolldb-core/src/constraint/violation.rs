//! Violation types reported by the constraint engine.

use std::fmt;

use thiserror::Error;

use crate::catalog::EntityType;
use crate::value::EntityId;

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    /// A foreign-key field references an identity with no live record of the
    /// declared type.
    #[error("field '{field}' references a {referenced} record that does not exist")]
    DanglingReference {
        /// The foreign-key field.
        field: String,
        /// The entity type the field must reference.
        referenced: EntityType,
    },

    /// A uniqueness constraint would be violated.
    #[error("duplicate value for unique field(s) {fields:?}, held by record {conflicting}")]
    DuplicateKey {
        /// The constrained field set.
        fields: Vec<String>,
        /// Identity of the record already holding the value.
        conflicting: EntityId,
    },

    /// An integer field is outside its declared inclusive bounds.
    #[error("field '{field}' value {value} is outside the range {min}..={max}")]
    RangeViolation {
        /// The bounded field.
        field: String,
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The offending value.
        value: i64,
    },
}

/// The complete set of violations for one attempted mutation.
///
/// Violations accumulate; a caller can surface every broken rule at once
/// rather than fixing them one at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintReport {
    /// The entity type the mutation targeted.
    pub entity: EntityType,
    /// Every broken rule, in catalog declaration order.
    pub violations: Vec<Violation>,
}

impl ConstraintReport {
    /// Create a report.
    pub fn new(entity: EntityType, violations: Vec<Violation>) -> Self {
        Self { entity, violations }
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Check if the report is empty (no violations).
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ConstraintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} constraint violation(s) on {}: ",
            self.violations.len(),
            self.entity
        )?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConstraintReport {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display_lists_all() {
        let report = ConstraintReport::new(
            EntityType::Enrollment,
            vec![
                Violation::DanglingReference {
                    field: "FK_Student_ID".to_string(),
                    referenced: EntityType::Student,
                },
                Violation::RangeViolation {
                    field: "Year_Level".to_string(),
                    min: 1,
                    max: 5,
                    value: 9,
                },
            ],
        );

        let rendered = report.to_string();
        assert!(rendered.contains("2 constraint violation(s) on Enrollment"));
        assert!(rendered.contains("FK_Student_ID"));
        assert!(rendered.contains("Year_Level"));
    }
}
