//! The entity store: CRUD by internal identity plus predicate lookup.

use std::cmp::Ordering;

use sled::{Db, Tree};

use super::{Record, StorageConfig};
use crate::catalog::EntityType;
use crate::error::Error;
use crate::value::{EntityId, Value, ENTITY_ID_SIZE};

/// Tree name for entity data.
const DATA_TREE: &str = "data";

/// An equality predicate over one or more fields (conjunction).
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    clauses: Vec<(String, Value)>,
}

impl Predicate {
    /// Match records where `field == value`.
    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            clauses: vec![(name.into(), value.into())],
        }
    }

    /// Add another `field == value` clause.
    pub fn and(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((name.into(), value.into()));
        self
    }

    /// Check whether a record satisfies every clause.
    pub fn matches(&self, record: &Record) -> bool {
        self.clauses
            .iter()
            .all(|(name, value)| record.get(name) == Some(value))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// Caller-supplied sort key for `find_all`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// Field name to order by.
    pub field: String,
    /// Sort direction.
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Desc,
        }
    }
}

/// The sled-backed entity store.
///
/// Key format: `entity_type \0 entity_id` in a single data tree; prefix
/// scans over `entity_type \0` iterate one type. The store assigns internal
/// identities on `put` and never interprets field semantics.
pub struct EntityStore {
    db: Db,
    data_tree: Tree,
}

impl EntityStore {
    /// Open or create an entity store with the given configuration.
    pub fn open(config: StorageConfig) -> Result<Self, Error> {
        let db = config.to_sled_config().open()?;
        let data_tree = db.open_tree(DATA_TREE)?;
        Ok(Self { db, data_tree })
    }

    /// Store a new record, assigning and returning a fresh identity.
    pub fn put(&self, entity: EntityType, record: Record) -> Result<EntityId, Error> {
        let id = EntityId::generate();
        let key = Self::data_key(entity, id);
        self.data_tree.insert(key, record.to_bytes()?)?;
        Ok(id)
    }

    /// Get a record by internal identity.
    pub fn get(&self, entity: EntityType, id: EntityId) -> Result<Option<Record>, Error> {
        let key = Self::data_key(entity, id);
        match self.data_tree.get(key)? {
            Some(bytes) => Ok(Some(Record::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Find the first record of a type matching a predicate.
    pub fn find_one(
        &self,
        entity: EntityType,
        predicate: &Predicate,
    ) -> Result<Option<(EntityId, Record)>, Error> {
        for result in self.scan_type(entity) {
            let (id, record) = result?;
            if predicate.matches(&record) {
                return Ok(Some((id, record)));
            }
        }
        Ok(None)
    }

    /// Find all records of a type matching an optional predicate, sorted by
    /// an optional caller-supplied key.
    ///
    /// Sorting applies to the base records; records missing the sort field
    /// order first ascending.
    pub fn find_all(
        &self,
        entity: EntityType,
        predicate: Option<&Predicate>,
        order: Option<&OrderBy>,
    ) -> Result<Vec<(EntityId, Record)>, Error> {
        let mut rows = Vec::new();
        for result in self.scan_type(entity) {
            let (id, record) = result?;
            if predicate.map_or(true, |p| p.matches(&record)) {
                rows.push((id, record));
            }
        }

        if let Some(order) = order {
            rows.sort_by(|(_, a), (_, b)| {
                let ord = match (a.get(&order.field), b.get(&order.field)) {
                    (Some(x), Some(y)) => x.compare(y).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Greater,
                    (None, Some(_)) => Ordering::Less,
                    (None, None) => Ordering::Equal,
                };
                match order.direction {
                    OrderDirection::Asc => ord,
                    OrderDirection::Desc => ord.reverse(),
                }
            });
        }

        Ok(rows)
    }

    /// Partially merge a patch into an existing record.
    ///
    /// Returns the updated record, or [`Error::NotFound`] with no effect if
    /// the identity is unknown.
    pub fn update(
        &self,
        entity: EntityType,
        id: EntityId,
        patch: &[(String, Value)],
    ) -> Result<Record, Error> {
        let key = Self::data_key(entity, id);
        let mut record = match self.data_tree.get(&key)? {
            Some(bytes) => Record::from_bytes(&bytes)?,
            None => return Err(Error::NotFound),
        };

        record.merge(patch);
        self.data_tree.insert(key, record.to_bytes()?)?;
        Ok(record)
    }

    /// Delete a record by internal identity, returning the removed record.
    ///
    /// No dependent-record scan happens here; records referencing the
    /// deleted identity keep their now-dangling reference.
    pub fn delete(&self, entity: EntityType, id: EntityId) -> Result<Record, Error> {
        let key = Self::data_key(entity, id);
        match self.data_tree.remove(key)? {
            Some(bytes) => Record::from_bytes(&bytes),
            None => Err(Error::NotFound),
        }
    }

    /// Scan all records of a type.
    pub fn scan_type(
        &self,
        entity: EntityType,
    ) -> impl Iterator<Item = Result<(EntityId, Record), Error>> + '_ {
        let prefix = Self::type_prefix(entity);
        let prefix_len = prefix.len();

        self.data_tree.scan_prefix(prefix).map(move |result| {
            let (key, bytes) = result?;
            if key.len() != prefix_len + ENTITY_ID_SIZE {
                return Err(Error::InvalidKey);
            }
            let mut id = [0u8; ENTITY_ID_SIZE];
            id.copy_from_slice(&key[prefix_len..]);
            let record = Record::from_bytes(&bytes)?;
            Ok((EntityId::from_bytes(id), record))
        })
    }

    /// Count records of a type.
    pub fn count(&self, entity: EntityType) -> Result<usize, Error> {
        let mut count = 0;
        for result in self.scan_type(entity) {
            result?;
            count += 1;
        }
        Ok(count)
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }

    /// Build the data key for an entity type + identity.
    fn data_key(entity: EntityType, id: EntityId) -> Vec<u8> {
        let name = entity.name().as_bytes();
        let mut key = Vec::with_capacity(name.len() + 1 + ENTITY_ID_SIZE);
        key.extend_from_slice(name);
        key.push(0); // Null separator
        key.extend_from_slice(id.as_bytes());
        key
    }

    /// Build the prefix for scanning all records of a type.
    fn type_prefix(entity: EntityType) -> Vec<u8> {
        let name = entity.name().as_bytes();
        let mut prefix = Vec::with_capacity(name.len() + 1);
        prefix.extend_from_slice(name);
        prefix.push(0); // Null separator
        prefix
    }
}
