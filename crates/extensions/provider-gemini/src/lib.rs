//! # AutoSlide Provider - Gemini
//!
//! Google Gemini vision backend for AutoSlide.

mod client;
mod provider;
mod types;

pub use client::GeminiClient;
pub use provider::{DEFAULT_MODEL, GeminiProvider};
pub use types::*;
