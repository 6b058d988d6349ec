//! Common types used across the protocol layer.

mod content;

pub use content::*;
