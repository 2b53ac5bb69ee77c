//! Domain layer for GymFlow.
//!
//! Holds the navigation gate, the query cache, list virtualization, the
//! timeout manager, domain models, and the traits infrastructure adapters
//! implement for the external services.

pub mod auth;
pub mod cache;
pub mod error;
pub mod exercise;
pub mod invitation;
pub mod storage;
pub mod student;
pub mod timeout;
pub mod validation;
pub mod virtualization;
pub mod workout;

// Re-export common error type
pub use error::{GymError, Result};
