//! Mutation coordinator: the single write path.

use tracing::debug;

use crate::catalog::{Catalog, EntityDef, EntityType};
use crate::constraint::{ConstraintEngine, ConstraintReport};
use crate::error::Error;
use crate::storage::{EntityStore, Record};
use crate::value::{EntityId, Value};

/// Sequences create/update/delete through normalization, the constraint
/// engine, and the entity store.
pub struct MutationCoordinator<'a> {
    catalog: &'a Catalog,
    store: &'a EntityStore,
}

impl<'a> MutationCoordinator<'a> {
    /// Create a new coordinator.
    pub fn new(catalog: &'a Catalog, store: &'a EntityStore) -> Self {
        Self { catalog, store }
    }

    /// Create a record: normalize, validate every declared rule, store.
    ///
    /// Returns the assigned internal identity, or the complete constraint
    /// report with nothing written.
    pub fn create(
        &self,
        entity: EntityType,
        mut fields: Vec<(String, Value)>,
    ) -> Result<EntityId, Error> {
        let def = self.catalog.entity(entity);
        normalize(def, &mut fields);

        let violations =
            ConstraintEngine::new(self.catalog, self.store).validate_insert(entity, &fields)?;
        if !violations.is_empty() {
            return Err(Error::Constraint(ConstraintReport::new(entity, violations)));
        }

        let id = self.store.put(entity, Record::new(fields))?;
        debug!(entity = %entity, id = %id, "record created");
        Ok(id)
    }

    /// Update a record in place: validate the merged view, then merge.
    ///
    /// Business keys and references re-validate whenever the patch touches
    /// them. Fails with [`Error::NotFound`] if the identity is unknown.
    pub fn update(
        &self,
        entity: EntityType,
        id: EntityId,
        mut patch: Vec<(String, Value)>,
    ) -> Result<Record, Error> {
        let def = self.catalog.entity(entity);
        normalize(def, &mut patch);

        let violations = ConstraintEngine::new(self.catalog, self.store)
            .validate_update(entity, id, &patch)?;
        if !violations.is_empty() {
            return Err(Error::Constraint(ConstraintReport::new(entity, violations)));
        }

        let record = self.store.update(entity, id, &patch)?;
        debug!(entity = %entity, id = %id, "record updated");
        Ok(record)
    }

    /// Delete a record by internal identity, returning the removed record.
    ///
    /// No dependent-record scan: records referencing the deleted identity
    /// are left orphaned and surface as broken references when a later read
    /// expands them.
    pub fn delete(&self, entity: EntityType, id: EntityId) -> Result<Record, Error> {
        let record = self.store.delete(entity, id)?;
        debug!(entity = %entity, id = %id, "record deleted");
        Ok(record)
    }
}

/// Apply the catalog's declared string normalization to a payload.
fn normalize(def: &EntityDef, fields: &mut [(String, Value)]) {
    for (name, value) in fields.iter_mut() {
        let Some(field_def) = def.field(name) else {
            continue;
        };
        if let Value::String(s) = value {
            if field_def.trim {
                *s = s.trim().to_string();
            }
            if field_def.uppercase {
                *s = s.to_uppercase();
            }
        }
    }
}
