//! Error types for media operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors from downloading or persisting pipeline artifacts.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Download of {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Download of {url} returned an empty body")]
    EmptyBody { url: String },

    #[error("Download failed: {message}")]
    DownloadFailed { message: String },

    #[error("Manifest persistence failed at {path}: {source}")]
    ManifestPersistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MediaError {
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    /// Whether this failure makes a whole run fatal. Only manifest
    /// persistence qualifies; everything else is a skipped asset.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, MediaError::ManifestPersistence { .. })
    }
}
