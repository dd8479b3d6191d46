//! Per-(user, project) workspace layout.

use std::path::{Path, PathBuf};

use vwv_models::ProjectKey;

use crate::error::MediaResult;

/// Filesystem area holding one project's downloaded assets and pipeline
/// artifacts.
///
/// Layout: `<root>/workspace_u{user}_p{project}/` containing `media/`,
/// `music/`, `clips.json` (the manifest), and `status.json`.
#[derive(Debug, Clone)]
pub struct ProjectWorkspace {
    key: ProjectKey,
    root: PathBuf,
}

impl ProjectWorkspace {
    /// Locate the workspace for a project under `base_dir`. Does not touch
    /// the filesystem; call [`ensure_dirs`](Self::ensure_dirs) before
    /// writing.
    pub fn new(base_dir: impl AsRef<Path>, key: ProjectKey) -> Self {
        Self {
            key,
            root: base_dir.as_ref().join(key.workspace_dir_name()),
        }
    }

    pub fn key(&self) -> ProjectKey {
        self.key
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Target directory for downloaded images and videos.
    pub fn media_dir(&self) -> PathBuf {
        self.root.join("media")
    }

    /// Target directory for downloaded audio.
    pub fn music_dir(&self) -> PathBuf {
        self.root.join("music")
    }

    /// The manifest file the serving layer reads.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("clips.json")
    }

    /// The pollable status artifact.
    pub fn status_path(&self) -> PathBuf {
        self.root.join("status.json")
    }

    /// Create the workspace tree if it does not exist yet.
    pub async fn ensure_dirs(&self) -> MediaResult<()> {
        tokio::fs::create_dir_all(self.media_dir()).await?;
        tokio::fs::create_dir_all(self.music_dir()).await?;
        Ok(())
    }
}

/// Atomically replace `path` with `bytes`: write to a temporary sibling,
/// then rename over the target so concurrent readers never observe a
/// partial file.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_layout_paths() {
        let ws = ProjectWorkspace::new("/data", ProjectKey::new(1, 66));
        assert_eq!(ws.root(), Path::new("/data/workspace_u1_p66"));
        assert_eq!(ws.media_dir(), Path::new("/data/workspace_u1_p66/media"));
        assert_eq!(ws.music_dir(), Path::new("/data/workspace_u1_p66/music"));
        assert_eq!(
            ws.manifest_path(),
            Path::new("/data/workspace_u1_p66/clips.json")
        );
    }

    #[tokio::test]
    async fn test_ensure_dirs_creates_tree() {
        let base = tempfile::tempdir().unwrap();
        let ws = ProjectWorkspace::new(base.path(), ProjectKey::new(2, 3));
        ws.ensure_dirs().await.unwrap();
        assert!(ws.media_dir().is_dir());
        assert!(ws.music_dir().is_dir());
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_content() {
        let base = tempfile::tempdir().unwrap();
        let path = base.path().join("artifact.json");
        write_atomic(&path, b"{\"v\":1}").await.unwrap();
        write_atomic(&path, b"{\"v\":2}").await.unwrap();
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "{\"v\":2}");
        assert!(!path.with_extension("tmp").exists());
    }
}
