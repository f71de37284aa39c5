//! Core domain logic for the movie catalog.
//! This crate owns the movie model, its validation rules and persistence.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::movie::{Movie, MovieField, MovieId, MovieValidationError};
pub use repo::movie_repo::{MovieRepository, RepoError, RepoResult, SqliteMovieRepository};
pub use service::movie_service::{MovieService, MovieServiceError, ServiceResult};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
