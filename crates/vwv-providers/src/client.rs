//! The provider client contract and shared HTTP plumbing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use vwv_models::{CandidateAsset, MediaKind, ProviderId};

use crate::error::ProviderResult;

/// Results requested per provider call. The orchestrator applies its own
/// per-keyword quota on top of this.
pub const DEFAULT_PER_PAGE: usize = 5;

/// Default timeout for one search request.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A stock-media search provider.
///
/// Implementations own provider-specific authentication and response
/// parsing. `search` is fallible; callers that must never fail go through
/// [`crate::registry::ProviderRegistry::search_or_empty`].
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Which provider this client talks to.
    fn id(&self) -> ProviderId;

    /// Media kinds this provider can serve.
    fn supports(&self, kind: MediaKind) -> bool;

    /// Search for candidates of the given kind.
    ///
    /// Bounded by the client's request timeout; parsing is defensive and
    /// skips entries with absent fields rather than failing the call.
    async fn search(&self, query: &str, kind: MediaKind) -> ProviderResult<Vec<CandidateAsset>>;
}

/// Build the reqwest client shared by a provider, with a bounded timeout.
pub(crate) fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Map a non-2xx response to a `ProviderError::Status`.
pub(crate) fn check_status(response: reqwest::Response) -> ProviderResult<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(crate::error::ProviderError::Status {
            status: status.as_u16(),
        });
    }
    Ok(response)
}
