//! Pexels search client (images and videos).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use vwv_models::{CandidateAsset, MediaKind, ProviderId};

use crate::client::{
    build_http_client, check_status, SearchProvider, DEFAULT_PER_PAGE, DEFAULT_SEARCH_TIMEOUT,
};
use crate::error::ProviderResult;

const DEFAULT_BASE_URL: &str = "https://api.pexels.com";

/// Pexels API client. The key travels in the `Authorization` header.
pub struct PexelsClient {
    api_key: String,
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PhotoSearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    width: Option<u32>,
    height: Option<u32>,
    src: Option<PhotoSrc>,
}

#[derive(Debug, Deserialize)]
struct PhotoSrc {
    original: Option<String>,
    large: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoSearchResponse {
    #[serde(default)]
    videos: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    duration: Option<f64>,
    #[serde(default)]
    video_files: Vec<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    link: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

impl PexelsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http: build_http_client(DEFAULT_SEARCH_TIMEOUT),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search_images(&self, query: &str) -> ProviderResult<Vec<CandidateAsset>> {
        let response = self
            .http
            .get(format!("{}/v1/search", self.base_url))
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", &DEFAULT_PER_PAGE.to_string())])
            .send()
            .await?;

        let body: PhotoSearchResponse = check_status(response)?.json().await?;

        let candidates = body
            .photos
            .into_iter()
            .filter_map(|photo| {
                // Large rendition first; original as the fallback.
                let url = photo.src.and_then(|s| s.large.or(s.original));
                let url = match url {
                    Some(u) => u,
                    None => {
                        debug!(provider = "pexels", "Skipping photo without src URL");
                        return None;
                    }
                };
                let mut candidate = CandidateAsset::new(ProviderId::Pexels, url, MediaKind::Image);
                if let (Some(w), Some(h)) = (photo.width, photo.height) {
                    candidate = candidate.with_dimensions(w, h);
                }
                Some(candidate)
            })
            .collect();

        Ok(candidates)
    }

    async fn search_videos(&self, query: &str) -> ProviderResult<Vec<CandidateAsset>> {
        let response = self
            .http
            .get(format!("{}/videos/search", self.base_url))
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", &DEFAULT_PER_PAGE.to_string())])
            .send()
            .await?;

        let body: VideoSearchResponse = check_status(response)?.json().await?;

        let candidates = body
            .videos
            .into_iter()
            .filter_map(|video| {
                // Best available: the widest file that has a link.
                let file = video
                    .video_files
                    .into_iter()
                    .filter(|f| f.link.is_some())
                    .max_by_key(|f| f.width.unwrap_or(0))?;
                let url = file.link?;
                let mut candidate = CandidateAsset::new(ProviderId::Pexels, url, MediaKind::Video);
                if let (Some(w), Some(h)) = (file.width, file.height) {
                    candidate = candidate.with_dimensions(w, h);
                }
                if let Some(d) = video.duration {
                    candidate = candidate.with_duration(d);
                }
                Some(candidate)
            })
            .collect();

        Ok(candidates)
    }
}

#[async_trait]
impl SearchProvider for PexelsClient {
    fn id(&self) -> ProviderId {
        ProviderId::Pexels
    }

    fn supports(&self, kind: MediaKind) -> bool {
        matches!(kind, MediaKind::Image | MediaKind::Video)
    }

    async fn search(&self, query: &str, kind: MediaKind) -> ProviderResult<Vec<CandidateAsset>> {
        match kind {
            MediaKind::Image => self.search_images(query).await,
            MediaKind::Video => self.search_videos(query).await,
            MediaKind::Music => Ok(Vec::new()),
        }
    }
}
