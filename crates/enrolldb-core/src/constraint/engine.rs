//! Constraint validation logic.
//!
//! The engine validates a candidate record (insert) or merged view (update)
//! against every rule the catalog declares for its entity type. All checks
//! run; violations accumulate into one list.

use crate::catalog::{Catalog, ConstraintDef, EntityDef, EntityType};
use crate::error::Error;
use crate::storage::{EntityStore, Predicate, Record};
use crate::value::{EntityId, Value};

use super::violation::Violation;

/// Constraint validator for enforcing catalog-declared rules.
///
/// Read-then-check only: two concurrent writers can both pass validation in
/// the window before either commits. The store offers no insert-if-absent
/// primitive, so that window is accepted.
pub struct ConstraintEngine<'a> {
    catalog: &'a Catalog,
    store: &'a EntityStore,
}

impl<'a> ConstraintEngine<'a> {
    /// Create a new constraint engine.
    pub fn new(catalog: &'a Catalog, store: &'a EntityStore) -> Self {
        Self { catalog, store }
    }

    /// Validate a candidate record for insertion.
    ///
    /// Returns the complete violation list (empty = valid). Storage faults
    /// surface as errors, not violations.
    pub fn validate_insert(
        &self,
        entity: EntityType,
        candidate: &[(String, Value)],
    ) -> Result<Vec<Violation>, Error> {
        let def = self.catalog.entity(entity);
        let mut violations = Vec::new();

        self.check_references(def, candidate, &mut violations)?;
        self.check_uniqueness(def, candidate, None, &mut violations)?;
        check_ranges(def, candidate, &mut violations);

        Ok(violations)
    }

    /// Validate a patch against the merged view of an existing record.
    ///
    /// Fails with [`Error::NotFound`] if the identity is unknown. Uniqueness
    /// lookups exclude the record's own identity so a record can keep its
    /// current values.
    pub fn validate_update(
        &self,
        entity: EntityType,
        id: EntityId,
        patch: &[(String, Value)],
    ) -> Result<Vec<Violation>, Error> {
        let existing = self
            .store
            .get(entity, id)?
            .ok_or(Error::NotFound)?;
        let merged: Record = existing.merged(patch);

        let def = self.catalog.entity(entity);
        let mut violations = Vec::new();

        self.check_references(def, &merged.fields, &mut violations)?;
        self.check_uniqueness(def, &merged.fields, Some(id), &mut violations)?;
        check_ranges(def, &merged.fields, &mut violations);

        Ok(violations)
    }

    /// Check every declared foreign-key edge whose field is present.
    ///
    /// Null references are not checked here; requiredness belongs to the
    /// input-validation layer. A non-reference value in a foreign-key field
    /// can never resolve, so it reports as dangling.
    fn check_references(
        &self,
        def: &EntityDef,
        fields: &[(String, Value)],
        violations: &mut Vec<Violation>,
    ) -> Result<(), Error> {
        for relation in &def.relations {
            let value = match get_field(fields, relation.field) {
                Some(v) => v,
                None => continue,
            };

            let resolved = match value {
                Value::Null => continue,
                Value::Ref(id) => self.store.get(relation.references, *id)?.is_some(),
                _ => false,
            };

            if !resolved {
                violations.push(Violation::DanglingReference {
                    field: relation.field.to_string(),
                    referenced: relation.references,
                });
            }
        }
        Ok(())
    }

    /// Check every uniqueness constraint whose fields are all present.
    fn check_uniqueness(
        &self,
        def: &EntityDef,
        fields: &[(String, Value)],
        exclude: Option<EntityId>,
        violations: &mut Vec<Violation>,
    ) -> Result<(), Error> {
        for constraint in &def.constraints {
            let ConstraintDef::Unique {
                fields: unique_fields,
                ..
            } = constraint
            else {
                continue;
            };

            let mut predicate: Option<Predicate> = None;
            for name in unique_fields {
                let Some(value) = get_field(fields, name) else {
                    predicate = None;
                    break;
                };
                predicate = Some(match predicate {
                    Some(p) => p.and(name.clone(), value.clone()),
                    None => Predicate::field(name.clone(), value.clone()),
                });
            }
            let Some(predicate) = predicate else {
                continue; // constraint fields not all present
            };

            if let Some((found, _)) = self.store.find_one(def.entity, &predicate)? {
                if Some(found) != exclude {
                    violations.push(Violation::DuplicateKey {
                        fields: unique_fields.clone(),
                        conflicting: found,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Check every range constraint whose field is present and integer-valued.
fn check_ranges(def: &EntityDef, fields: &[(String, Value)], violations: &mut Vec<Violation>) {
    for constraint in &def.constraints {
        let ConstraintDef::Range {
            field, min, max, ..
        } = constraint
        else {
            continue;
        };

        if let Some(value) = get_field(fields, field).and_then(Value::as_i64) {
            if value < *min || value > *max {
                violations.push(Violation::RangeViolation {
                    field: field.clone(),
                    min: *min,
                    max: *max,
                    value,
                });
            }
        }
    }
}

fn get_field<'f>(fields: &'f [(String, Value)], name: &str) -> Option<&'f Value> {
    fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageConfig;

    fn setup() -> (Catalog, EntityStore) {
        let catalog = Catalog::school();
        let store = EntityStore::open(StorageConfig::temporary()).unwrap();
        (catalog, store)
    }

    fn course_fields(id: i64, name: &str) -> Vec<(String, Value)> {
        vec![
            ("Course_ID".to_string(), Value::Int64(id)),
            ("Name".to_string(), Value::from(name)),
            ("Department".to_string(), Value::from(name)),
        ]
    }

    #[test]
    fn test_valid_insert_passes() {
        let (catalog, store) = setup();
        let engine = ConstraintEngine::new(&catalog, &store);

        let violations = engine
            .validate_insert(EntityType::Course, &course_fields(101, "Nursing"))
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_duplicate_business_key() {
        let (catalog, store) = setup();
        let first = store
            .put(EntityType::Course, Record::new(course_fields(101, "Nursing")))
            .unwrap();

        let engine = ConstraintEngine::new(&catalog, &store);
        let violations = engine
            .validate_insert(EntityType::Course, &course_fields(101, "Midwifery"))
            .unwrap();

        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0],
            Violation::DuplicateKey {
                fields: vec!["Course_ID".to_string()],
                conflicting: first,
            }
        );
    }

    #[test]
    fn test_dangling_reference() {
        let (catalog, store) = setup();
        let engine = ConstraintEngine::new(&catalog, &store);

        let fields = vec![
            ("Subject_Code".to_string(), Value::from("T125")),
            ("Name".to_string(), Value::from("Intro To Computing")),
            ("Units".to_string(), Value::Int64(3)),
            ("FK_Course_ID".to_string(), Value::Ref(EntityId::generate())),
        ];
        let violations = engine.validate_insert(EntityType::Subject, &fields).unwrap();

        assert_eq!(
            violations,
            vec![Violation::DanglingReference {
                field: "FK_Course_ID".to_string(),
                referenced: EntityType::Course,
            }]
        );
    }

    #[test]
    fn test_violations_accumulate() {
        let (catalog, store) = setup();
        store
            .put(EntityType::Course, Record::new(course_fields(101, "Nursing")))
            .unwrap();

        let engine = ConstraintEngine::new(&catalog, &store);

        // Duplicate Course_ID, duplicate Name, and a non-positive id: every
        // broken rule must appear in one report.
        let violations = engine
            .validate_insert(
                EntityType::Course,
                &[
                    ("Course_ID".to_string(), Value::Int64(101)),
                    ("Name".to_string(), Value::from("Nursing")),
                ],
            )
            .unwrap();
        assert_eq!(violations.len(), 2);

        let violations = engine
            .validate_insert(EntityType::Course, &course_fields(0, "Pharmacy"))
            .unwrap();
        assert_eq!(
            violations,
            vec![Violation::RangeViolation {
                field: "Course_ID".to_string(),
                min: 1,
                max: i64::MAX,
                value: 0,
            }]
        );
    }

    #[test]
    fn test_update_keeps_own_values() {
        let (catalog, store) = setup();
        let id = store
            .put(EntityType::Course, Record::new(course_fields(101, "Nursing")))
            .unwrap();

        let engine = ConstraintEngine::new(&catalog, &store);

        // Changing an unrelated field keeps the business key; the record's
        // own identity must not count as a conflict.
        let violations = engine
            .validate_update(
                EntityType::Course,
                id,
                &[("Department".to_string(), Value::from("Health Sciences"))],
            )
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_update_into_conflict() {
        let (catalog, store) = setup();
        store
            .put(EntityType::Course, Record::new(course_fields(101, "Nursing")))
            .unwrap();
        let other = store
            .put(EntityType::Course, Record::new(course_fields(102, "Midwifery")))
            .unwrap();

        let engine = ConstraintEngine::new(&catalog, &store);
        let violations = engine
            .validate_update(
                EntityType::Course,
                other,
                &[("Course_ID".to_string(), Value::Int64(101))],
            )
            .unwrap();

        assert_eq!(violations.len(), 1);
        assert!(matches!(violations[0], Violation::DuplicateKey { .. }));
    }

    #[test]
    fn test_update_unknown_identity() {
        let (catalog, store) = setup();
        let engine = ConstraintEngine::new(&catalog, &store);

        let result = engine.validate_update(EntityType::Course, EntityId::generate(), &[]);
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[test]
    fn test_range_bounds() {
        let (catalog, store) = setup();
        let course = store
            .put(EntityType::Course, Record::new(course_fields(101, "Nursing")))
            .unwrap();

        let engine = ConstraintEngine::new(&catalog, &store);

        let mut fields = vec![
            ("Subject_Code".to_string(), Value::from("T125")),
            ("Name".to_string(), Value::from("Intro To Computing")),
            ("Units".to_string(), Value::Int64(6)),
            ("FK_Course_ID".to_string(), Value::Ref(course)),
        ];
        // Units == 6 is the inclusive maximum
        assert!(engine
            .validate_insert(EntityType::Subject, &fields)
            .unwrap()
            .is_empty());

        fields[2].1 = Value::Int64(7);
        let violations = engine.validate_insert(EntityType::Subject, &fields).unwrap();
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0],
            Violation::RangeViolation { max: 6, value: 7, .. }
        ));
    }
}
