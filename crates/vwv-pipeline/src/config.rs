//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Tunable pipeline policy.
///
/// The per-keyword quota, the video-search toggle, and download
/// parallelism are deployment policy, not code constants.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory under which per-project workspaces live.
    pub workspace_root: PathBuf,
    /// Maximum candidates collected per keyword per media kind before
    /// search short-circuits.
    pub per_keyword_quota: usize,
    /// Whether video providers are queried at all.
    pub fetch_videos: bool,
    /// Maximum simultaneous in-flight downloads.
    pub max_download_parallel: usize,
    /// Timeout for one asset download.
    pub download_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("workspace"),
            per_keyword_quota: 3,
            fetch_videos: true,
            max_download_parallel: 4,
            download_timeout: Duration::from_secs(30),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            workspace_root: std::env::var("VWV_WORKSPACE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.workspace_root),
            per_keyword_quota: std::env::var("VWV_KEYWORD_QUOTA")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.per_keyword_quota),
            fetch_videos: std::env::var("VWV_FETCH_VIDEOS")
                .ok()
                .map(|s| s != "0" && !s.eq_ignore_ascii_case("false"))
                .unwrap_or(defaults.fetch_videos),
            max_download_parallel: std::env::var("VWV_MAX_DOWNLOAD_PARALLEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_download_parallel),
            download_timeout: Duration::from_secs(
                std::env::var("VWV_DOWNLOAD_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}
