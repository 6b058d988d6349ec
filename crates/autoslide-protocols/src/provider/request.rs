//! Vision request types.

use serde::{Deserialize, Serialize};

use crate::types::ContentPart;

/// A single question to a vision model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionRequest {
    /// Model override; the provider default is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// System instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Ordered user content (text and images).
    #[serde(default)]
    pub parts: Vec<ContentPart>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl VisionRequest {
    /// Create a request from user content parts.
    pub fn new(parts: Vec<ContentPart>) -> Self {
        Self {
            parts,
            ..Default::default()
        }
    }

    /// Set the system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Number of image parts in the request.
    pub fn image_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, ContentPart::Image { .. }))
            .count()
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
