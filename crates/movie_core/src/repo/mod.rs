//! Repository layer over the movie document store.
//!
//! # Responsibility
//! - Define the data access contract used by the service layer.
//! - Isolate SQLite query details from validation and orchestration.
//!
//! # Invariants
//! - Repositories perform no field validation and no duplicate checks.
//! - Semantic misses (`NotFound`, `TitleNotFound`, `NoTitleMatch`) are
//!   reported separately from DB transport errors.

pub mod movie_repo;
