//! Gemini vision provider implementation.

use async_trait::async_trait;
use tracing::debug;

use autoslide_protocols::{
    ContentPart, ImageSource, ProviderError, Usage, VisionProvider, VisionRequest, VisionResponse,
};

use crate::client::GeminiClient;
use crate::types::*;

/// Model used when neither the request nor the configuration names one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Gemini vision provider.
pub struct GeminiProvider {
    client: GeminiClient,
    default_model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    pub fn new(api_key: String) -> Self {
        Self::with_client(GeminiClient::new(api_key))
    }

    pub fn with_client(client: GeminiClient) -> Self {
        Self {
            client,
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set the model used when a request does not name one.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    fn convert_parts(parts: &[ContentPart]) -> Result<Vec<Part>, ProviderError> {
        parts
            .iter()
            .map(|part| match part {
                ContentPart::Text { text } => Ok(Part::Text { text: text.clone() }),
                ContentPart::Image {
                    source: ImageSource::Base64 { media_type, data },
                } => Ok(Part::InlineData {
                    inline_data: InlineData {
                        mime_type: media_type.clone(),
                        data: data.clone(),
                    },
                }),
                ContentPart::Image {
                    source: ImageSource::Url { url },
                } => Err(ProviderError::InvalidRequest(format!(
                    "Gemini requires inline image data, got URL {}",
                    url
                ))),
            })
            .collect()
    }

    fn build_request(&self, request: &VisionRequest) -> Result<GenerateContentRequest, ProviderError> {
        let generation_config = GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        };
        Ok(GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: Self::convert_parts(&request.parts)?,
            }],
            system_instruction: request.system.as_ref().map(|system| Content {
                role: None,
                parts: vec![Part::Text {
                    text: system.clone(),
                }],
            }),
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
        })
    }
}

#[async_trait]
impl VisionProvider for GeminiProvider {
    fn id(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(&self, request: VisionRequest) -> Result<VisionResponse, ProviderError> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let gemini_request = self.build_request(&request)?;
        debug!(
            model = %model,
            images = request.image_count(),
            "Sending Gemini vision request"
        );

        let response = self.client.generate_content(&model, &gemini_request).await?;

        let Some(text) = response.text() else {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone());
            return Err(match reason {
                Some(reason) => ProviderError::ContentFiltered(reason),
                None => ProviderError::InvalidResponse("No candidates in response".to_string()),
            });
        };

        Ok(VisionResponse {
            model: response.model_version.clone().unwrap_or(model),
            text,
            usage: response.usage_metadata.as_ref().map(|u| Usage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
            }),
        })
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
