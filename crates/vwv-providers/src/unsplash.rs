//! Unsplash search client (images only).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use vwv_models::{CandidateAsset, MediaKind, ProviderId};

use crate::client::{
    build_http_client, check_status, SearchProvider, DEFAULT_PER_PAGE, DEFAULT_SEARCH_TIMEOUT,
};
use crate::error::ProviderResult;

const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

/// Unsplash API client. Auth is `Authorization: Client-ID <key>`.
pub struct UnsplashClient {
    access_key: String,
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    width: Option<u32>,
    height: Option<u32>,
    urls: Option<Urls>,
}

#[derive(Debug, Deserialize)]
struct Urls {
    regular: Option<String>,
    full: Option<String>,
}

impl UnsplashClient {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            http: build_http_client(DEFAULT_SEARCH_TIMEOUT),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchProvider for UnsplashClient {
    fn id(&self) -> ProviderId {
        ProviderId::Unsplash
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Image
    }

    async fn search(&self, query: &str, kind: MediaKind) -> ProviderResult<Vec<CandidateAsset>> {
        if kind != MediaKind::Image {
            return Ok(Vec::new());
        }

        let response = self
            .http
            .get(format!("{}/search/photos", self.base_url))
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .query(&[("query", query), ("per_page", &DEFAULT_PER_PAGE.to_string())])
            .send()
            .await?;

        let body: SearchResponse = check_status(response)?.json().await?;

        let candidates = body
            .results
            .into_iter()
            .filter_map(|result| {
                let url = result.urls.and_then(|u| u.regular.or(u.full));
                let url = match url {
                    Some(u) => u,
                    None => {
                        debug!(provider = "unsplash", "Skipping result without URL");
                        return None;
                    }
                };
                let mut candidate = CandidateAsset::new(ProviderId::Unsplash, url, MediaKind::Image);
                if let (Some(w), Some(h)) = (result.width, result.height) {
                    candidate = candidate.with_dimensions(w, h);
                }
                Some(candidate)
            })
            .collect();

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_uses_client_id_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .and(header("Authorization", "Client-ID abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"width": 3000, "height": 2000, "urls": {"regular": "https://images.unsplash.com/x?w=1080"}},
                    {"urls": {}}
                ]
            })))
            .mount(&server)
            .await;

        let client = UnsplashClient::new("abc").with_base_url(server.uri());
        let results = client.search("forest", MediaKind::Image).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].provider, ProviderId::Unsplash);
    }

    #[tokio::test]
    async fn test_video_kind_short_circuits() {
        // No mock mounted: a request would fail, proving none is sent.
        let client = UnsplashClient::new("abc").with_base_url("http://127.0.0.1:1");
        let results = client.search("forest", MediaKind::Video).await.unwrap();
        assert!(results.is_empty());
    }
}
