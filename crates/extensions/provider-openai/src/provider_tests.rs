use super::*;
use autoslide_protocols::ContentPart;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn distance_request() -> VisionRequest {
    VisionRequest::new(vec![ContentPart::image("image/png", "iVBORw0KGgo=")])
        .with_system("Measure the distance.")
        .with_temperature(0.0)
        .with_max_tokens(50)
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 900, "completion_tokens": 3, "total_tokens": 903}
    })
}

async fn provider_for(server: &MockServer) -> OpenAIProvider {
    OpenAIProvider::with_url(
        "test-key".to_string(),
        format!("{}/v1/chat/completions", server.uri()),
    )
}

#[test]
fn test_provider_id() {
    let provider = OpenAIProvider::new("test-key".to_string());
    assert_eq!(provider.id(), "openai");
    assert_eq!(provider.default_model(), "gpt-4o");
}

#[test]
fn test_default_api_url_constant() {
    assert_eq!(DEFAULT_API_URL, "https://api.openai.com/v1/chat/completions");
}

#[test]
fn test_custom_url_and_model() {
    let provider = OpenAIProvider::with_url(
        "test-key".to_string(),
        "https://custom.api/v1".to_string(),
    )
    .with_default_model("gpt-4.1");
    assert_eq!(provider.api_url, "https://custom.api/v1");
    assert_eq!(provider.default_model(), "gpt-4.1");
}

#[test]
fn test_build_request_uses_default_model() {
    let provider = OpenAIProvider::new("key".to_string());
    let api_request = provider.build_request(&distance_request());
    assert_eq!(api_request.model, "gpt-4o");
    assert_eq!(api_request.messages.len(), 2);
}

#[tokio::test]
async fn test_complete_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o",
            "temperature": 0.0,
            "max_tokens": 50,
            "messages": [
                {"role": "system", "content": "Measure the distance."},
                {"role": "user", "content": [
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,iVBORw0KGgo="}}
                ]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("134")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let response = provider.complete(distance_request()).await.unwrap();
    assert_eq!(response.text, "134");
    assert_eq!(response.model, "gpt-4o-2024-08-06");
    assert_eq!(response.usage.unwrap().completion_tokens, 3);
}

#[tokio::test]
async fn test_complete_server_error_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider.complete(distance_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::ApiError { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_complete_auth_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider.complete(distance_request()).await.unwrap_err();
    match err {
        ProviderError::AuthenticationFailed(message) => {
            assert_eq!(message, "Incorrect API key provided")
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider.complete(distance_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited { .. }));
}

#[tokio::test]
async fn test_complete_refusal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": null, "refusal": "I can't help with that."},
                "finish_reason": "stop"
            }]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider.complete(distance_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::ContentFiltered(_)));
}

#[tokio::test]
async fn test_complete_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider.complete(distance_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_network_error() {
    let provider = OpenAIProvider::with_url(
        "test-key".to_string(),
        "http://127.0.0.1:1/v1/chat/completions".to_string(),
    );
    let err = provider.complete(distance_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Network(_)));
}
