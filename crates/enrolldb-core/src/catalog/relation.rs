//! Foreign-key edge declarations between entities.

use super::entity::EntityType;

/// A foreign-key edge: a field on the owning entity that holds the internal
/// identity of a record of the referenced type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDef {
    /// Foreign-key field on the owning entity.
    pub field: &'static str,
    /// Entity type the field references.
    pub references: EntityType,
}

impl RelationDef {
    /// Declare a foreign-key edge.
    pub fn new(field: &'static str, references: EntityType) -> Self {
        Self { field, references }
    }
}
