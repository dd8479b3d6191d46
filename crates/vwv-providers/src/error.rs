//! Provider error types.

use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors from a single provider search call.
///
/// These never propagate past the registry boundary; they are logged and
/// degraded to empty result lists so the run continues.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}")]
    Status { status: u16 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Short classification token used in structured logs.
    pub fn class(&self) -> &'static str {
        match self {
            ProviderError::Request(e) if e.is_timeout() => "timeout",
            ProviderError::Request(_) => "network",
            ProviderError::Status { .. } => "http_status",
            ProviderError::MalformedResponse(_) => "malformed",
        }
    }
}
