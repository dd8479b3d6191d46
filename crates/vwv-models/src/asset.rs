//! Media kinds, provider identities, and asset descriptors.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of media an asset or query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Music,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Music => "music",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of a stock-media provider.
///
/// Every candidate carries exactly one provider so manifest source
/// tracking never conflates providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Pixabay,
    Pexels,
    Unsplash,
    Jamendo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Pixabay => "pixabay",
            ProviderId::Pexels => "pexels",
            ProviderId::Unsplash => "unsplash",
            ProviderId::Jamendo => "jamendo",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A provider search result that has not been downloaded yet.
///
/// Transient: exists only between search and the download decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateAsset {
    /// Provider that returned this candidate.
    pub provider: ProviderId,
    /// Direct URL to the media file.
    pub source_url: String,
    /// Kind of media this candidate is.
    pub kind: MediaKind,
    /// Pixel width, when the provider reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height, when the provider reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Duration in seconds for video/music candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

impl CandidateAsset {
    /// Create a candidate with no dimension metadata.
    pub fn new(provider: ProviderId, source_url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            provider,
            source_url: source_url.into(),
            kind,
            width: None,
            height: None,
            duration_secs: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration_secs = Some(secs);
        self
    }
}

/// A fetched asset persisted on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadedAsset {
    /// Where the bytes were written.
    pub local_path: PathBuf,
    /// URL the bytes came from.
    pub source_url: String,
    /// Extension chosen by the detection chain (no leading dot).
    pub extension: String,
    /// Size on disk; always non-zero.
    pub byte_size: u64,
    /// Kind of media.
    pub kind: MediaKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_builder() {
        let c = CandidateAsset::new(ProviderId::Pixabay, "https://example.com/a.jpg", MediaKind::Image)
            .with_dimensions(1920, 1080);
        assert_eq!(c.provider, ProviderId::Pixabay);
        assert_eq!(c.width, Some(1920));
        assert!(c.duration_secs.is_none());
    }

    #[test]
    fn test_media_kind_serde() {
        let json = serde_json::to_string(&MediaKind::Music).unwrap();
        assert_eq!(json, "\"music\"");
    }
}
