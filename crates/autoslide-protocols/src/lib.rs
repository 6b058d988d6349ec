//! # AutoSlide Protocols
//!
//! Core protocol definitions (traits) for the AutoSlide solver.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`Surface`] - The interactive page region a puzzle lives in
//! - [`VisionProvider`] - A vision model reached through a request/response API

pub mod error;
pub mod provider;
pub mod surface;
pub mod types;

// Re-export core traits
pub use provider::{VisionProvider, VisionRequest, VisionResponse};
pub use surface::{Indicator, Observation, Selector, Surface};
pub use error::{OracleError, ProviderError, SurfaceError};
pub use types::*;
