//! Vision provider trait definition.

use async_trait::async_trait;

use super::{VisionRequest, VisionResponse};
use crate::error::ProviderError;

/// Core trait for vision providers.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Returns the provider ID (e.g. `"openai"`, `"gemini"`).
    fn id(&self) -> &str;

    /// Model used when a request does not name one.
    fn default_model(&self) -> &str;

    /// Ask the model a question about the request's images.
    async fn complete(&self, request: VisionRequest) -> Result<VisionResponse, ProviderError>;
}
