//! Priority-ordered provider registry.

use std::sync::Arc;

use tracing::{info, warn};

use vwv_models::{CandidateAsset, MediaKind};

use crate::client::SearchProvider;
use crate::config::ProviderKeys;
use crate::jamendo::JamendoClient;
use crate::pexels::PexelsClient;
use crate::pixabay::PixabayClient;
use crate::unsplash::UnsplashClient;

/// The set of enabled providers, in fixed priority order per media kind.
///
/// Built once at composition time from [`ProviderKeys`] and shared by all
/// runs. Providers without a key are not registered, so their searches
/// trivially contribute zero results.
pub struct ProviderRegistry {
    image: Vec<Arc<dyn SearchProvider>>,
    video: Vec<Arc<dyn SearchProvider>>,
    music: Vec<Arc<dyn SearchProvider>>,
}

impl ProviderRegistry {
    /// Build the registry from configured keys.
    ///
    /// Priority order: images Pixabay, Pexels, Unsplash; videos Pixabay,
    /// Pexels; music Jamendo.
    pub fn from_keys(keys: &ProviderKeys) -> Self {
        let mut image: Vec<Arc<dyn SearchProvider>> = Vec::new();
        let mut video: Vec<Arc<dyn SearchProvider>> = Vec::new();
        let mut music: Vec<Arc<dyn SearchProvider>> = Vec::new();

        if let Some(key) = &keys.pixabay {
            let client = Arc::new(PixabayClient::new(key.clone()));
            image.push(client.clone());
            video.push(client);
        } else {
            info!(provider = "pixabay", "No API key; provider disabled");
        }

        if let Some(key) = &keys.pexels {
            let client = Arc::new(PexelsClient::new(key.clone()));
            image.push(client.clone());
            video.push(client);
        } else {
            info!(provider = "pexels", "No API key; provider disabled");
        }

        if let Some(key) = &keys.unsplash {
            image.push(Arc::new(UnsplashClient::new(key.clone())));
        } else {
            info!(provider = "unsplash", "No API key; provider disabled");
        }

        if let Some(key) = &keys.jamendo {
            music.push(Arc::new(JamendoClient::new(key.clone())));
        } else {
            info!(provider = "jamendo", "No client ID; provider disabled");
        }

        Self { image, video, music }
    }

    /// Build a registry from explicit provider lists (composition roots
    /// and tests that inject mock-backed clients).
    pub fn from_providers(
        image: Vec<Arc<dyn SearchProvider>>,
        video: Vec<Arc<dyn SearchProvider>>,
        music: Vec<Arc<dyn SearchProvider>>,
    ) -> Self {
        Self { image, video, music }
    }

    /// Enabled providers for a kind, in priority order.
    pub fn providers_for(&self, kind: MediaKind) -> &[Arc<dyn SearchProvider>] {
        match kind {
            MediaKind::Image => &self.image,
            MediaKind::Video => &self.video,
            MediaKind::Music => &self.music,
        }
    }

    /// Search one provider, degrading any failure to an empty list.
    ///
    /// The classified error is logged here; callers treat the provider
    /// as having found nothing and move on.
    pub async fn search_or_empty(
        &self,
        provider: &Arc<dyn SearchProvider>,
        query: &str,
        kind: MediaKind,
    ) -> Vec<CandidateAsset> {
        match provider.search(query, kind).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    provider = %provider.id(),
                    kind = %kind,
                    query = query,
                    error_class = e.class(),
                    error = %e,
                    "Provider search failed; treating as zero results"
                );
                Vec::new()
            }
        }
    }
}
