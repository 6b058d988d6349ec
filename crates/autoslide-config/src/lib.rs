//! # AutoSlide Config
//!
//! Configuration management for the AutoSlide solver.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
