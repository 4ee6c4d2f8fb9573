//! Constraint enforcement for EnrollDB.
//!
//! The engine checks every declared rule for a mutation and reports the
//! complete list of violations, never stopping at the first:
//! - foreign-key existence (referenced record must be live at write time)
//! - uniqueness (single-field and compound, business keys included)
//! - integer range bounds

mod engine;
mod violation;

pub use engine::ConstraintEngine;
pub use violation::{ConstraintReport, Violation};
