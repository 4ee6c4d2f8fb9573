//! Runtime value types and the opaque internal identity.

use std::cmp::Ordering;
use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};

/// Size of an internal identity in bytes.
pub const ENTITY_ID_SIZE: usize = 16;

/// Opaque, store-assigned internal identity.
///
/// All relationship wiring uses this identity; business keys (Student_ID,
/// Subject_Code, ...) are ordinary record fields with uniqueness constraints.
/// The identity is immutable for the lifetime of a record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
pub struct EntityId([u8; ENTITY_ID_SIZE]);

impl EntityId {
    /// Wrap raw identity bytes.
    pub fn from_bytes(bytes: [u8; ENTITY_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw identity bytes.
    pub fn as_bytes(&self) -> &[u8; ENTITY_ID_SIZE] {
        &self.0
    }

    /// Generate a fresh identity (UUID v4 bit pattern).
    ///
    /// Combines a nanosecond timestamp with a process-wide counter so two
    /// identities generated in the same instant still differ.
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::time::{SystemTime, UNIX_EPOCH};

        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_nanos() as u64;
        let counter = COUNTER.fetch_add(1, Ordering::SeqCst);

        let mut id = [0u8; ENTITY_ID_SIZE];
        id[..8].copy_from_slice(&now.to_le_bytes());
        id[8..16].copy_from_slice(&counter.to_le_bytes());

        // Set UUID version 4 bits
        id[6] = (id[6] & 0x0f) | 0x40;
        id[8] = (id[8] & 0x3f) | 0x80;

        Self(id)
    }

    /// Format the identity as lowercase hex.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.to_hex())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl serde::Serialize for EntityId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A runtime field value.
///
/// This enum covers every attribute type the academic schema needs: numeric
/// business keys and levels, enrollment dates, free text, and references to
/// other records by internal identity.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub enum Value {
    /// Null value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// Timestamp as microseconds since Unix epoch.
    Timestamp(i64),
    /// UTF-8 string.
    String(String),
    /// Reference to another record by internal identity.
    Ref(EntityId),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as i64 (integers only; timestamps are distinct).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as a referenced identity.
    pub fn as_ref_id(&self) -> Option<EntityId> {
        match self {
            Value::Ref(id) => Some(*id),
            _ => None,
        }
    }

    /// Compare two values of the same variant.
    ///
    /// Returns `None` for mismatched variants; callers sorting mixed data
    /// decide how to break the tie.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Ref(a), Value::Ref(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<EntityId> for Value {
    fn from(v: EntityId) -> Self {
        Value::Ref(v)
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Int64(i) => serializer.serialize_i64(*i),
            Value::Timestamp(t) => serializer.serialize_i64(*t),
            Value::String(s) => serializer.serialize_str(s),
            Value::Ref(id) => serializer.serialize_str(&id.to_hex()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = EntityId::generate();
        let b = EntityId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_formatting() {
        let id = EntityId::from_bytes([0xab; 16]);
        assert_eq!(id.to_hex(), "ab".repeat(16));
        assert_eq!(format!("{id}"), id.to_hex());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Int64(42).as_i64(), Some(42));
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert!(Value::Null.is_null());

        let id = EntityId::generate();
        assert_eq!(Value::Ref(id).as_ref_id(), Some(id));
        assert_eq!(Value::Int64(1).as_ref_id(), None);
    }

    #[test]
    fn test_value_compare() {
        assert_eq!(
            Value::Int64(1).compare(&Value::Int64(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::from("b").compare(&Value::from("a")),
            Some(Ordering::Greater)
        );
        // Mismatched variants do not order
        assert_eq!(Value::Int64(1).compare(&Value::from("1")), None);
    }
}
