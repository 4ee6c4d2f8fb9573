//! Record type for stored values.

use rkyv::{Archive, Deserialize, Serialize};

use crate::error::Error;
use crate::value::Value;

/// A stored record: named field values plus lifecycle timestamps.
///
/// The internal identity is the storage key, not a field; records hold only
/// business attributes and foreign-key references.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Record {
    /// Field name/value pairs, in insertion order.
    pub fields: Vec<(String, Value)>,

    /// Creation timestamp in microseconds since Unix epoch.
    pub created_at: u64,

    /// Last-update timestamp in microseconds since Unix epoch.
    pub updated_at: u64,
}

impl Record {
    /// Create a new record with the current timestamp.
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        let now = current_timestamp();
        Self {
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Merge a patch into this record (replace existing fields, append new
    /// ones) and refresh `updated_at`. Returns the names of changed fields.
    pub fn merge(&mut self, patch: &[(String, Value)]) -> Vec<String> {
        let mut changed = Vec::new();
        for (name, value) in patch {
            if let Some(pos) = self.fields.iter().position(|(n, _)| n == name) {
                if self.fields[pos].1 != *value {
                    changed.push(name.clone());
                }
                self.fields[pos].1 = value.clone();
            } else {
                changed.push(name.clone());
                self.fields.push((name.clone(), value.clone()));
            }
        }
        self.updated_at = current_timestamp();
        changed
    }

    /// Produce the merged view of this record under a patch, without
    /// touching the stored copy.
    pub fn merged(&self, patch: &[(String, Value)]) -> Record {
        let mut merged = self.clone();
        merged.merge(patch);
        merged
    }

    /// Serialize the record to bytes using rkyv.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a record from bytes using rkyv.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }
}

/// Get current timestamp in microseconds since Unix epoch.
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before Unix epoch")
        .as_micros() as u64
}
