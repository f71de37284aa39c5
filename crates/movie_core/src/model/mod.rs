//! Domain model for the movie catalog.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every stored movie is identified by a stable `MovieId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod movie;
