//! Domain model for the notes application.
//!
//! # Responsibility
//! - Define the single persisted entity and its identifiers.
//!
//! # Invariants
//! - One user owns zero or more notes; notes never reference each other.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
