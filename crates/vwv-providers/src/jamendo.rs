//! Jamendo search client (royalty-free music).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use vwv_models::{CandidateAsset, MediaKind, ProviderId};

use crate::client::{
    build_http_client, check_status, SearchProvider, DEFAULT_PER_PAGE, DEFAULT_SEARCH_TIMEOUT,
};
use crate::error::ProviderResult;

const DEFAULT_BASE_URL: &str = "https://api.jamendo.com";

/// Jamendo API client. Auth is the `client_id` query parameter.
pub struct JamendoClient {
    client_id: String,
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TrackSearchResponse {
    #[serde(default)]
    results: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    audio: Option<String>,
    duration: Option<f64>,
}

impl JamendoClient {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
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
impl SearchProvider for JamendoClient {
    fn id(&self) -> ProviderId {
        ProviderId::Jamendo
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Music
    }

    async fn search(&self, query: &str, kind: MediaKind) -> ProviderResult<Vec<CandidateAsset>> {
        if kind != MediaKind::Music {
            return Ok(Vec::new());
        }

        let response = self
            .http
            .get(format!("{}/v3.0/tracks/", self.base_url))
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("format", "json"),
                ("search", query),
                ("audioformat", "mp32"),
                ("limit", &DEFAULT_PER_PAGE.to_string()),
            ])
            .send()
            .await?;

        let body: TrackSearchResponse = check_status(response)?.json().await?;

        let candidates = body
            .results
            .into_iter()
            .filter_map(|track| {
                let url = match track.audio {
                    Some(u) if !u.is_empty() => u,
                    _ => {
                        debug!(provider = "jamendo", "Skipping track without audio URL");
                        return None;
                    }
                };
                let mut candidate = CandidateAsset::new(ProviderId::Jamendo, url, MediaKind::Music);
                if let Some(d) = track.duration {
                    candidate = candidate.with_duration(d);
                }
                Some(candidate)
            })
            .collect();

        Ok(candidates)
    }
}
