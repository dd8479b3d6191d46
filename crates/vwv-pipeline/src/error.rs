//! Pipeline error types.

use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that can end a pipeline run.
///
/// Provider and per-asset download failures never become a
/// `PipelineError`; they are degraded to empty results or skipped assets
/// inside the run. What remains fatal is workspace setup and manifest
/// persistence.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Media error: {0}")]
    Media(#[from] vwv_media::MediaError),

    #[error("Provider error: {0}")]
    Provider(#[from] vwv_providers::ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
