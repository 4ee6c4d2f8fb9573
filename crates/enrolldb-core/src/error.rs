//! Core error types.

use thiserror::Error;

use crate::constraint::ConstraintReport;

/// Core database errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Key decoding error.
    #[error("invalid key format")]
    InvalidKey,

    /// Record not found by internal identity.
    #[error("record not found")]
    NotFound,

    /// One or more declared constraints rejected a mutation.
    ///
    /// Carries the complete violation list; nothing was written.
    #[error("{0}")]
    Constraint(ConstraintReport),

    /// A join plan named a field the catalog does not declare as a
    /// foreign key. This is a caller bug, surfaced as a typed error.
    #[error("field '{0}' is not a declared foreign key")]
    UnknownJoinField(String),

    /// Invalid data format.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Check whether this error is a constraint rejection.
    pub fn is_constraint(&self) -> bool {
        matches!(self, Error::Constraint(_))
    }

    /// Get the constraint report, if this is a constraint rejection.
    pub fn constraint_report(&self) -> Option<&ConstraintReport> {
        match self {
            Error::Constraint(report) => Some(report),
            _ => None,
        }
    }
}
