//! Tubely core library
//!
//! Shared foundation for the Tubely workspace: configuration, the unified
//! error type, domain models, and request validation helpers.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
