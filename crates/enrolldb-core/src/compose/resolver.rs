//! Join resolution: base fetch, then reference expansion.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::catalog::{Catalog, EntityType};
use crate::error::Error;
use crate::storage::{EntityStore, OrderBy, Predicate, Record};
use crate::value::{EntityId, Value};

use super::plan::JoinPlan;

/// A field value in a composed view.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinedValue {
    /// An unexpanded value (including references the plan did not request).
    Scalar(Value),
    /// An expanded reference, substituted with the fetched record.
    Record(Box<ComposedRecord>),
    /// A requested reference whose target no longer exists.
    Broken {
        /// The entity type the field should have resolved to.
        referenced: EntityType,
        /// The dangling identity.
        identity: EntityId,
    },
}

impl JoinedValue {
    /// Try to get as an expanded record.
    pub fn as_record(&self) -> Option<&ComposedRecord> {
        match self {
            JoinedValue::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Try to get as an unexpanded scalar.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            JoinedValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Check if this is a broken-reference marker.
    pub fn is_broken(&self) -> bool {
        matches!(self, JoinedValue::Broken { .. })
    }
}

/// A record with its requested references expanded in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedRecord {
    /// The record's entity type.
    pub entity: EntityType,
    /// The record's internal identity.
    pub identity: EntityId,
    /// Field name/value pairs; expanded references hold nested records.
    pub fields: Vec<(String, JoinedValue)>,
    /// Creation timestamp (microseconds since Unix epoch).
    pub created_at: u64,
    /// Last-update timestamp (microseconds since Unix epoch).
    pub updated_at: u64,
}

impl ComposedRecord {
    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&JoinedValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

impl serde::Serialize for ComposedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 4))?;
        map.serialize_entry("_id", &self.identity)?;
        map.serialize_entry("_type", self.entity.name())?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("created_at", &self.created_at)?;
        map.serialize_entry("updated_at", &self.updated_at)?;
        map.end()
    }
}

impl serde::Serialize for JoinedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JoinedValue::Scalar(value) => value.serialize(serializer),
            JoinedValue::Record(record) => record.serialize(serializer),
            JoinedValue::Broken { identity, .. } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("_broken_ref", identity)?;
                map.end()
            }
        }
    }
}

/// Resolves joined views by walking a declared plan over stored records.
pub struct ComposeResolver<'a> {
    catalog: &'a Catalog,
    store: &'a EntityStore,
}

impl<'a> ComposeResolver<'a> {
    /// Create a new resolver.
    pub fn new(catalog: &'a Catalog, store: &'a EntityStore) -> Self {
        Self { catalog, store }
    }

    /// Resolve one record by internal identity.
    ///
    /// Fails with [`Error::NotFound`] if the base record is absent; a missing
    /// join target never fails the read.
    pub fn resolve(
        &self,
        entity: EntityType,
        id: EntityId,
        plan: &JoinPlan,
    ) -> Result<ComposedRecord, Error> {
        let record = self.store.get(entity, id)?.ok_or(Error::NotFound)?;
        self.compose(entity, id, record, plan)
    }

    /// Resolve the first record matching a predicate (business-key lookup).
    pub fn resolve_one(
        &self,
        entity: EntityType,
        predicate: &Predicate,
        plan: &JoinPlan,
    ) -> Result<Option<ComposedRecord>, Error> {
        match self.store.find_one(entity, predicate)? {
            Some((id, record)) => Ok(Some(self.compose(entity, id, record, plan)?)),
            None => Ok(None),
        }
    }

    /// Resolve all records of a type, optionally filtered and sorted.
    ///
    /// The sort key applies to the base records before expansion.
    pub fn resolve_all(
        &self,
        entity: EntityType,
        predicate: Option<&Predicate>,
        order: Option<&OrderBy>,
        plan: &JoinPlan,
    ) -> Result<Vec<ComposedRecord>, Error> {
        let rows = self.store.find_all(entity, predicate, order)?;
        let mut views = Vec::with_capacity(rows.len());
        for (id, record) in rows {
            views.push(self.compose(entity, id, record, plan)?);
        }
        Ok(views)
    }

    /// Expand a fetched record according to the plan.
    fn compose(
        &self,
        entity: EntityType,
        id: EntityId,
        record: Record,
        plan: &JoinPlan,
    ) -> Result<ComposedRecord, Error> {
        let def = self.catalog.entity(entity);

        // Every requested field must be a declared foreign key; a typo'd
        // plan is a caller bug, reported before any expansion work.
        for spec in &plan.joins {
            if def.relation_for(&spec.field).is_none() {
                return Err(Error::UnknownJoinField(spec.field.clone()));
            }
        }

        let mut fields = Vec::with_capacity(record.fields.len());
        for (name, value) in record.fields {
            let spec = plan.spec_for(&name);
            let relation = def.relation_for(&name);
            let joined = match (spec, relation, value) {
                (Some(spec), Some(relation), Value::Ref(target)) => {
                    match self.store.get(relation.references, target)? {
                        Some(target_record) => {
                            let nested = self.compose(
                                relation.references,
                                target,
                                target_record,
                                &spec.nested,
                            )?;
                            JoinedValue::Record(Box::new(nested))
                        }
                        // Target vanished: mark, don't abort.
                        None => JoinedValue::Broken {
                            referenced: relation.references,
                            identity: target,
                        },
                    }
                }
                (_, _, value) => JoinedValue::Scalar(value),
            };
            fields.push((name, joined));
        }

        Ok(ComposedRecord {
            entity,
            identity: id,
            fields,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
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

    fn put_course(store: &EntityStore, id: i64, name: &str) -> EntityId {
        store
            .put(
                EntityType::Course,
                Record::new(vec![
                    ("Course_ID".to_string(), Value::Int64(id)),
                    ("Name".to_string(), Value::from(name)),
                    ("Department".to_string(), Value::from(name)),
                ]),
            )
            .unwrap()
    }

    fn put_subject(store: &EntityStore, code: &str, course: EntityId) -> EntityId {
        store
            .put(
                EntityType::Subject,
                Record::new(vec![
                    ("Subject_Code".to_string(), Value::from(code)),
                    ("Name".to_string(), Value::from("Intro To Computing")),
                    ("Units".to_string(), Value::Int64(3)),
                    ("FK_Course_ID".to_string(), Value::Ref(course)),
                ]),
            )
            .unwrap()
    }

    #[test]
    fn test_empty_plan_leaves_raw_identities() {
        let (catalog, store) = setup();
        let course = put_course(&store, 101, "Nursing");
        let subject = put_subject(&store, "T125", course);

        let resolver = ComposeResolver::new(&catalog, &store);
        let view = resolver
            .resolve(EntityType::Subject, subject, &JoinPlan::new())
            .unwrap();

        assert_eq!(
            view.get("FK_Course_ID").unwrap().as_scalar(),
            Some(&Value::Ref(course))
        );
    }

    #[test]
    fn test_single_level_expansion() {
        let (catalog, store) = setup();
        let course = put_course(&store, 101, "Nursing");
        let subject = put_subject(&store, "T125", course);

        let resolver = ComposeResolver::new(&catalog, &store);
        let view = resolver
            .resolve(
                EntityType::Subject,
                subject,
                &JoinPlan::new().expand("FK_Course_ID"),
            )
            .unwrap();

        let expanded = view.get("FK_Course_ID").unwrap().as_record().unwrap();
        assert_eq!(expanded.entity, EntityType::Course);
        assert_eq!(expanded.identity, course);
        assert_eq!(
            expanded.get("Name").unwrap().as_scalar(),
            Some(&Value::from("Nursing"))
        );
    }

    #[test]
    fn test_broken_reference_marker() {
        let (catalog, store) = setup();
        let course = put_course(&store, 101, "Nursing");
        let subject = put_subject(&store, "T125", course);

        // Orphan the subject, then resolve it
        store.delete(EntityType::Course, course).unwrap();

        let resolver = ComposeResolver::new(&catalog, &store);
        let view = resolver
            .resolve(
                EntityType::Subject,
                subject,
                &JoinPlan::new().expand("FK_Course_ID"),
            )
            .unwrap();

        assert_eq!(
            view.get("FK_Course_ID").unwrap(),
            &JoinedValue::Broken {
                referenced: EntityType::Course,
                identity: course,
            }
        );
        // The rest of the record still resolved
        assert_eq!(
            view.get("Subject_Code").unwrap().as_scalar(),
            Some(&Value::from("T125"))
        );
    }

    #[test]
    fn test_unknown_join_field() {
        let (catalog, store) = setup();
        let course = put_course(&store, 101, "Nursing");
        let subject = put_subject(&store, "T125", course);

        let resolver = ComposeResolver::new(&catalog, &store);
        let result = resolver.resolve(
            EntityType::Subject,
            subject,
            &JoinPlan::new().expand("Units"),
        );

        assert!(matches!(result, Err(Error::UnknownJoinField(f)) if f == "Units"));
    }

    #[test]
    fn test_resolve_missing_base() {
        let (catalog, store) = setup();
        let resolver = ComposeResolver::new(&catalog, &store);

        let result = resolver.resolve(EntityType::Subject, EntityId::generate(), &JoinPlan::new());
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[test]
    fn test_resolve_all_sorts_base_before_expansion() {
        let (catalog, store) = setup();
        let nursing = put_course(&store, 101, "Nursing");
        let it = put_course(&store, 102, "Information Technology");
        put_subject(&store, "T125", it);
        put_subject(&store, "GE340", nursing);

        let resolver = ComposeResolver::new(&catalog, &store);
        let views = resolver
            .resolve_all(
                EntityType::Subject,
                None,
                Some(&OrderBy::asc("Subject_Code")),
                &JoinPlan::new().expand("FK_Course_ID"),
            )
            .unwrap();

        let codes: Vec<_> = views
            .iter()
            .map(|v| v.get("Subject_Code").unwrap().as_scalar().unwrap().clone())
            .collect();
        assert_eq!(codes, [Value::from("GE340"), Value::from("T125")]);
        assert!(views[0].get("FK_Course_ID").unwrap().as_record().is_some());
    }

    #[test]
    fn test_resolve_one_by_business_key() {
        let (catalog, store) = setup();
        let course = put_course(&store, 101, "Nursing");
        put_subject(&store, "T125", course);

        let resolver = ComposeResolver::new(&catalog, &store);
        let view = resolver
            .resolve_one(
                EntityType::Subject,
                &Predicate::field("Subject_Code", "T125"),
                &JoinPlan::new(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(view.entity, EntityType::Subject);

        assert!(resolver
            .resolve_one(
                EntityType::Subject,
                &Predicate::field("Subject_Code", "T999"),
                &JoinPlan::new(),
            )
            .unwrap()
            .is_none());
    }
}
