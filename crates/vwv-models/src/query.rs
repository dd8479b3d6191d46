//! Search queries issued to providers.

use serde::{Deserialize, Serialize};

use crate::asset::MediaKind;
use crate::platform::Platform;

/// One search request against the provider registry.
///
/// Created per keyword per run and discarded after use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Script-derived keyword to search for.
    pub keyword: String,
    /// Platform the project targets (drives filtering downstream).
    pub platform: Platform,
    /// Kind of media to search.
    pub kind: MediaKind,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, platform: Platform, kind: MediaKind) -> Self {
        Self {
            keyword: keyword.into(),
            platform,
            kind,
        }
    }
}
