//! Core use-case services.
//!
//! # Responsibility
//! - Apply request-level validation before persistence.
//! - Keep callers decoupled from storage details.

pub mod movie_service;
