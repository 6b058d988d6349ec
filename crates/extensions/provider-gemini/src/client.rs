//! Gemini API client.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use autoslide_protocols::ProviderError;

use crate::types::*;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Create a client against a different API root (proxies, tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self::build(api_key, base_url, 300)
    }

    /// Bound each HTTP round trip.
    pub fn with_timeout(self, timeout_secs: u64) -> Self {
        Self::build(self.api_key, self.base_url, timeout_secs)
    }

    fn build(api_key: String, base_url: String, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        }
    }

    /// Generate content (non-streaming).
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        debug!("Gemini generate_content: model={}", model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !status.is_success() {
            let error: Result<GeminiError, _> = serde_json::from_str(&body);
            return match error {
                Ok(e) => Err(ProviderError::from_api_response(
                    status.as_u16(),
                    e.error.message,
                )),
                Err(_) => Err(ProviderError::from_api_response(status.as_u16(), body)),
            };
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
        })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
