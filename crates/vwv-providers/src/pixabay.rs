//! Pixabay search client (images and videos).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use vwv_models::{CandidateAsset, MediaKind, ProviderId};

use crate::client::{
    build_http_client, check_status, SearchProvider, DEFAULT_PER_PAGE, DEFAULT_SEARCH_TIMEOUT,
};
use crate::error::ProviderResult;

const DEFAULT_BASE_URL: &str = "https://pixabay.com";

/// Pixabay API client. The key travels as a query parameter.
pub struct PixabayClient {
    api_key: String,
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ImageSearchResponse {
    #[serde(default)]
    hits: Vec<ImageHit>,
}

#[derive(Debug, Deserialize)]
struct ImageHit {
    #[serde(rename = "largeImageURL")]
    large_image_url: Option<String>,
    #[serde(rename = "imageWidth")]
    image_width: Option<u32>,
    #[serde(rename = "imageHeight")]
    image_height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct VideoSearchResponse {
    #[serde(default)]
    hits: Vec<VideoHit>,
}

#[derive(Debug, Deserialize)]
struct VideoHit {
    duration: Option<f64>,
    videos: Option<VideoVariants>,
}

#[derive(Debug, Deserialize)]
struct VideoVariants {
    large: Option<VideoVariant>,
    medium: Option<VideoVariant>,
}

#[derive(Debug, Deserialize)]
struct VideoVariant {
    url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

impl PixabayClient {
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
            .get(format!("{}/api/", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("image_type", "photo"),
                ("per_page", &DEFAULT_PER_PAGE.to_string()),
            ])
            .send()
            .await?;

        let body: ImageSearchResponse = check_status(response)?.json().await?;

        let candidates = body
            .hits
            .into_iter()
            .filter_map(|hit| {
                let url = match hit.large_image_url {
                    Some(u) => u,
                    None => {
                        debug!(provider = "pixabay", "Skipping hit without largeImageURL");
                        return None;
                    }
                };
                let mut candidate = CandidateAsset::new(ProviderId::Pixabay, url, MediaKind::Image);
                if let (Some(w), Some(h)) = (hit.image_width, hit.image_height) {
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
            .get(format!("{}/api/videos/", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("per_page", &DEFAULT_PER_PAGE.to_string()),
            ])
            .send()
            .await?;

        let body: VideoSearchResponse = check_status(response)?.json().await?;

        let candidates = body
            .hits
            .into_iter()
            .filter_map(|hit| {
                // Best available resolution: large first, then medium.
                let variant = hit
                    .videos
                    .and_then(|v| v.large.filter(|l| l.url.is_some()).or(v.medium))?;
                let url = match variant.url {
                    Some(u) => u,
                    None => {
                        debug!(provider = "pixabay", "Skipping video hit without variant URL");
                        return None;
                    }
                };
                let mut candidate = CandidateAsset::new(ProviderId::Pixabay, url, MediaKind::Video);
                if let (Some(w), Some(h)) = (variant.width, variant.height) {
                    candidate = candidate.with_dimensions(w, h);
                }
                if let Some(d) = hit.duration {
                    candidate = candidate.with_duration(d);
                }
                Some(candidate)
            })
            .collect();

        Ok(candidates)
    }
}

#[async_trait]
impl SearchProvider for PixabayClient {
    fn id(&self) -> ProviderId {
        ProviderId::Pixabay
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
