//! Vision response types.

use serde::{Deserialize, Serialize};

use crate::types::Usage;

/// Response from a vision model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionResponse {
    /// Model that answered.
    pub model: String,

    /// Raw text answer.
    pub text: String,

    /// Token usage, when reported.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl VisionResponse {
    /// Create a response carrying only text.
    pub fn text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            text: text.into(),
            usage: None,
        }
    }
}
