//! OpenAI vision backend for AutoSlide.

mod api;
mod converter;
mod provider;

pub use provider::{DEFAULT_MODEL, OpenAIProvider};
