//! The per-project manifest: the contract with the serving layer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Persisted record of a project's selected media and music clips.
///
/// All three list fields are always present after a load; missing keys in
/// the underlying JSON are filled with empty lists, never `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Project this manifest belongs to.
    #[serde(default)]
    pub project_id: i64,
    /// Ordered local paths of downloaded images and videos.
    #[serde(default)]
    pub media_clips: Vec<String>,
    /// Ordered local paths of downloaded audio tracks.
    #[serde(default)]
    pub music_clips: Vec<String>,
    /// Subtitle entries; produced by a downstream collaborator, always
    /// present (possibly empty) here.
    #[serde(default)]
    pub subtitles: Vec<serde_json::Value>,
}

impl Manifest {
    /// Create an empty manifest for a project.
    pub fn empty(project_id: i64) -> Self {
        Self {
            project_id,
            ..Default::default()
        }
    }

    /// Drop duplicate paths from both clip lists, preserving first-seen
    /// order. A physical file must not appear twice.
    pub fn dedup_paths(&mut self) {
        fn dedup(list: &mut Vec<String>) {
            let mut seen = HashSet::new();
            list.retain(|p| seen.insert(p.clone()));
        }
        dedup(&mut self.media_clips);
        dedup(&mut self.music_clips);
    }
}
