//! Mutation coordination for EnrollDB.
//!
//! Create/update/delete sequencing: normalize the payload, run the
//! constraint engine, then touch storage. A validation failure means zero
//! storage mutation.

mod coordinator;

pub use coordinator::MutationCoordinator;
