//! Error types for the AutoSlide protocol layer.

mod oracle;
mod provider;
mod surface;

pub use oracle::*;
pub use provider::*;
pub use surface::*;
