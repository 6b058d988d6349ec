//! Surface value types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ContentPart;

/// A CSS selector identifying a page element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An element whose presence signals an outcome, optionally required to contain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub selector: Selector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Indicator {
    pub fn new(selector: impl Into<Selector>) -> Self {
        Self {
            selector: selector.into(),
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Whether a candidate element's text satisfies this indicator.
    pub fn matches_text(&self, element_text: &str) -> bool {
        match &self.text {
            Some(expected) => element_text.contains(expected.as_str()),
            None => true,
        }
    }
}

/// A captured visual snapshot of a page region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Short description for diagnostics (e.g. `"scan-1@100px"`).
    pub label: String,
    /// MIME type of the encoded image.
    pub media_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl Observation {
    /// Create a PNG observation from base64 data.
    pub fn png(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            media_type: "image/png".to_string(),
            data: data.into(),
        }
    }

    /// Relabel the observation, keeping the pixels.
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Convert into an image content part for a vision request.
    pub fn to_content_part(&self) -> ContentPart {
        ContentPart::image(self.media_type.clone(), self.data.clone())
    }
}
