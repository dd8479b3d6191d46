//! Manifest persistence.

use tracing::{info, warn};

use vwv_models::Manifest;

use crate::error::{MediaError, MediaResult};
use crate::workspace::{write_atomic, ProjectWorkspace};

/// Reads and writes a project's manifest (`clips.json`).
///
/// Saves are atomic (write-to-temporary, then rename) so polling readers
/// never observe a torn file. Loads degrade gracefully: an absent or
/// malformed file yields a schema-filled empty manifest, never a parse
/// error.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    workspace: ProjectWorkspace,
}

impl ManifestStore {
    pub fn new(workspace: ProjectWorkspace) -> Self {
        Self { workspace }
    }

    /// Load the manifest, filling missing keys with empty lists.
    pub async fn load(&self) -> Manifest {
        let path = self.workspace.manifest_path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(_) => return Manifest::empty(self.workspace.key().project_id),
        };
        match serde_json::from_slice::<Manifest>(&bytes) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Malformed manifest; treating as empty"
                );
                Manifest::empty(self.workspace.key().project_id)
            }
        }
    }

    /// Whether a manifest has been written for this project.
    pub async fn exists(&self) -> bool {
        tokio::fs::metadata(self.workspace.manifest_path())
            .await
            .is_ok()
    }

    /// Persist the manifest atomically.
    ///
    /// This is the one write whose failure is fatal to a run; errors map
    /// to [`MediaError::ManifestPersistence`].
    pub async fn save(&self, manifest: &Manifest) -> MediaResult<()> {
        let path = self.workspace.manifest_path();
        let bytes = serde_json::to_vec_pretty(manifest)?;
        write_atomic(&path, &bytes)
            .await
            .map_err(|source| MediaError::ManifestPersistence {
                path: path.clone(),
                source,
            })?;

        info!(
            project = %self.workspace.key(),
            media_clips = manifest.media_clips.len(),
            music_clips = manifest.music_clips.len(),
            "Manifest saved"
        );
        Ok(())
    }
}
