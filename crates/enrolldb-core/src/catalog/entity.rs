//! Entity types and their definitions.

use std::fmt;

use super::constraint::ConstraintDef;
use super::field::{FieldDef, ScalarType};
use super::relation::RelationDef;

/// The closed set of entity types.
///
/// Using an enum rather than free-form names makes referencing an undeclared
/// entity type unrepresentable: every variant has a definition in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum EntityType {
    /// A registered student.
    Student,
    /// A degree program (e.g. BS Information Technology).
    Course,
    /// A subject offered under a course.
    Subject,
    /// A student's enrollment in a course for a term.
    Enrollment,
    /// One scheduled subject row on an enrollment's registration.
    StudentSchedule,
}

impl EntityType {
    /// All entity types, in declaration order.
    pub const ALL: [EntityType; 5] = [
        EntityType::Student,
        EntityType::Course,
        EntityType::Subject,
        EntityType::Enrollment,
        EntityType::StudentSchedule,
    ];

    /// Stable name used for storage keys and messages.
    pub fn name(self) -> &'static str {
        match self {
            EntityType::Student => "Student",
            EntityType::Course => "Course",
            EntityType::Subject => "Subject",
            EntityType::Enrollment => "Enrollment",
            EntityType::StudentSchedule => "StudentSchedule",
        }
    }

    /// Index into catalog storage.
    pub(crate) fn index(self) -> usize {
        match self {
            EntityType::Student => 0,
            EntityType::Course => 1,
            EntityType::Subject => 2,
            EntityType::Enrollment => 3,
            EntityType::StudentSchedule => 4,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An entity definition: fields, business key, constraints, and
/// foreign-key edges.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDef {
    /// The entity type this definition describes.
    pub entity: EntityType,
    /// Name of the business-key field (human-chosen, unique).
    pub business_key: String,
    /// Field declarations.
    pub fields: Vec<FieldDef>,
    /// Uniqueness and range constraints.
    pub constraints: Vec<ConstraintDef>,
    /// Foreign-key edges.
    pub relations: Vec<RelationDef>,
}

impl EntityDef {
    /// Create a new entity definition.
    pub fn new(entity: EntityType, business_key: impl Into<String>) -> Self {
        Self {
            entity,
            business_key: business_key.into(),
            fields: Vec::new(),
            constraints: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: ConstraintDef) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Add a foreign-key edge and its reference field.
    pub fn with_reference(mut self, field: &'static str, references: EntityType) -> Self {
        self.fields.push(FieldDef::new(field, ScalarType::Reference));
        self.relations.push(RelationDef::new(field, references));
        self
    }

    /// Get a field declaration by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the foreign-key edge declared on a field, if any.
    pub fn relation_for(&self, field: &str) -> Option<&RelationDef> {
        self.relations.iter().find(|r| r.field == field)
    }

    /// All uniqueness constraints.
    pub fn unique_constraints(&self) -> impl Iterator<Item = &ConstraintDef> {
        self.constraints.iter().filter(|c| c.is_unique())
    }
}
