//! Vision request conversion for OpenAI API.

use autoslide_protocols::{ContentPart as ProtoContentPart, Usage, VisionRequest, VisionResponse};

use crate::api::{ApiMessage, ApiRequest, ApiResponse, ContentPart, ImageUrl, MessageContent};

/// Build a chat-completions request: optional system message, then one multimodal user message.
pub fn convert_request(request: &VisionRequest, model: &str) -> ApiRequest {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system {
        messages.push(ApiMessage {
            role: "system".to_string(),
            content: MessageContent::Text(system.clone()),
        });
    }
    messages.push(ApiMessage {
        role: "user".to_string(),
        content: MessageContent::Parts(convert_parts(&request.parts)),
    });

    ApiRequest {
        model: request.model.clone().unwrap_or_else(|| model.to_string()),
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

fn convert_parts(parts: &[ProtoContentPart]) -> Vec<ContentPart> {
    parts
        .iter()
        .map(|part| match part {
            ProtoContentPart::Text { text } => ContentPart::Text { text: text.clone() },
            ProtoContentPart::Image { source } => ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: source.to_url(),
                    detail: None,
                },
            },
        })
        .collect()
}

/// Text of the first choice; refusals and empty choices are `None`.
pub fn parse_response(response: ApiResponse) -> Option<VisionResponse> {
    let usage = response.usage.as_ref().map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
    });
    let text = response.choices.into_iter().next()?.message.content?;
    Some(VisionResponse {
        model: response.model,
        text,
        usage,
    })
}
