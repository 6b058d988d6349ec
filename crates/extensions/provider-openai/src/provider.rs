//! OpenAI provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use autoslide_protocols::{ProviderError, VisionProvider, VisionRequest, VisionResponse};

use crate::api::{ApiErrorBody, ApiRequest, ApiResponse};
use crate::converter::{convert_request, parse_response};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Model used when neither the request nor the configuration names one.
pub const DEFAULT_MODEL: &str = "gpt-4o";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// OpenAI vision provider.
pub struct OpenAIProvider {
    api_key: String,
    api_url: String,
    default_model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, DEFAULT_API_URL.to_string())
    }

    /// Create provider with custom API URL (for OpenAI-compatible APIs).
    pub fn with_url(api_key: String, api_url: String) -> Self {
        Self {
            api_key,
            api_url,
            default_model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            client: build_client(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the model used when a request does not name one.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Bound each HTTP round trip.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self.client = build_client(timeout_secs);
        self
    }

    fn build_request(&self, request: &VisionRequest) -> ApiRequest {
        convert_request(request, &self.default_model)
    }

    async fn send_request(&self, api_request: &ApiRequest) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(api_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(ProviderError::from_api_response(status, message));
        }

        Ok(response)
    }
}

fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

#[async_trait]
impl VisionProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(&self, request: VisionRequest) -> Result<VisionResponse, ProviderError> {
        let api_request = self.build_request(&request);
        debug!(
            model = %api_request.model,
            images = request.image_count(),
            "Sending OpenAI vision request"
        );
        let response = self.send_request(&api_request).await?;
        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if let Some(refusal) = api_response
            .choices
            .first()
            .and_then(|c| c.message.refusal.clone())
        {
            return Err(ProviderError::ContentFiltered(refusal));
        }
        parse_response(api_response)
            .ok_or_else(|| ProviderError::InvalidResponse("No message content in response".to_string()))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
