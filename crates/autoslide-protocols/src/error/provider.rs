//! Vision provider errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not found: {0}")]
    NotFound(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited: retry after {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

impl ProviderError {
    /// Classify a non-success HTTP status returned by a provider API.
    pub fn from_api_response(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => ProviderError::InvalidRequest(message),
            401 | 403 => ProviderError::AuthenticationFailed(message),
            429 => ProviderError::RateLimited {
                retry_after_seconds: 0,
            },
            _ => ProviderError::ApiError { status, message },
        }
    }

    /// Whether repeating the identical request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::ApiError { status, .. } => *status >= 500,
            ProviderError::RateLimited { .. }
            | ProviderError::Network(_)
            | ProviderError::Timeout(_) => true,
            _ => false,
        }
    }
}
