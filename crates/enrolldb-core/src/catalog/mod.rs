//! Relationship catalog for EnrollDB.
//!
//! The catalog is the static declaration the rest of the core operates on:
//! for each entity type, its fields, its business key, its uniqueness and
//! range constraints, and its foreign-key edges. It is immutable after
//! construction and shared by reference.

mod catalog;
mod constraint;
mod entity;
mod field;
mod relation;
mod school;

pub use catalog::Catalog;
pub use constraint::ConstraintDef;
pub use entity::{EntityDef, EntityType};
pub use field::{FieldDef, ScalarType};
pub use relation::RelationDef;
