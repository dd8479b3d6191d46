//! The pipeline run: search, filter, download, manifest.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use vwv_media::{Downloader, ExpectedKind, ManifestStore, ProjectWorkspace, StatusReporter};
use vwv_models::{CandidateAsset, Manifest, MediaKind, Platform, ProjectKey, StatusRecord};
use vwv_providers::ProviderRegistry;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::filter::is_suitable;
use crate::run_lock::{RunGuard, RunLockRegistry};

/// Result of asking the pipeline to start a run.
#[derive(Debug, Clone)]
pub struct TriggerOutcome {
    pub accepted: bool,
    pub message: String,
}

struct PipelineInner {
    registry: ProviderRegistry,
    downloader: Downloader,
    locks: RunLockRegistry,
    config: PipelineConfig,
}

/// Composition root of the acquisition pipeline.
///
/// Holds the provider registry, the downloader, and the run-lock
/// registry; cheap to clone and share across callers. Runs are triggered
/// per (user, project) and progress is observed through the status and
/// manifest artifacts, never through the trigger call itself.
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

impl Pipeline {
    pub fn new(registry: ProviderRegistry, config: PipelineConfig) -> Self {
        let downloader = Downloader::new(config.download_timeout);
        Self {
            inner: Arc::new(PipelineInner {
                registry,
                downloader,
                locks: RunLockRegistry::new(),
                config,
            }),
        }
    }

    /// Start a run in the background.
    ///
    /// The lock is taken synchronously, so a second trigger for the same
    /// project is rejected before any work is spawned. The guard moves
    /// into the spawned task and releases on every exit path.
    pub fn trigger(
        &self,
        key: ProjectKey,
        platform: Platform,
        keywords: Vec<String>,
    ) -> TriggerOutcome {
        let Some(guard) = self.inner.locks.try_acquire(key) else {
            return TriggerOutcome {
                accepted: false,
                message: format!("project {} is already processing", key),
            };
        };

        let inner = self.inner.clone();
        tokio::spawn(async move {
            execute(inner, guard, platform, keywords).await;
        });

        TriggerOutcome {
            accepted: true,
            message: "processing started".to_string(),
        }
    }

    /// Run inline and return once the run has finished.
    ///
    /// Same single-flight semantics as [`trigger`](Self::trigger), but
    /// the caller awaits completion instead of polling.
    pub async fn run_and_wait(
        &self,
        key: ProjectKey,
        platform: Platform,
        keywords: Vec<String>,
    ) -> TriggerOutcome {
        let Some(guard) = self.inner.locks.try_acquire(key) else {
            return TriggerOutcome {
                accepted: false,
                message: format!("project {} is already processing", key),
            };
        };

        execute(self.inner.clone(), guard, platform, keywords).await;
        TriggerOutcome {
            accepted: true,
            message: "processing finished".to_string(),
        }
    }

    /// Workspace location for a project under this pipeline's root.
    pub fn workspace_for(&self, key: ProjectKey) -> ProjectWorkspace {
        ProjectWorkspace::new(&self.inner.config.workspace_root, key)
    }

    /// Current persisted status; absent records poll as idle.
    pub async fn status(&self, key: ProjectKey) -> StatusRecord {
        StatusReporter::read(&self.workspace_for(key)).await
    }

    /// Whether a manifest has been written for the project.
    pub async fn is_manifest_ready(&self, key: ProjectKey) -> bool {
        ManifestStore::new(self.workspace_for(key)).exists().await
    }

    /// Load the project manifest, empty when none exists yet.
    pub async fn load_manifest(&self, key: ProjectKey) -> Manifest {
        ManifestStore::new(self.workspace_for(key)).load().await
    }
}

/// One full run. Owns the guard; status reaches a terminal stage on both
/// the success and failure paths before the lock is released.
async fn execute(
    inner: Arc<PipelineInner>,
    guard: RunGuard,
    platform: Platform,
    keywords: Vec<String>,
) {
    let key = guard.key();
    let workspace = ProjectWorkspace::new(&inner.config.workspace_root, key);
    let reporter = StatusReporter::new(workspace.clone());

    if let Err(e) = workspace.ensure_dirs().await {
        error!(project = %key, error = %e, "Workspace setup failed; aborting run");
        // Pollers must still see a terminal stage whenever the status
        // file is writable at all.
        reporter.begin_run("starting run").await.ok();
        if let Err(e) = reporter.fail(e.to_string()).await {
            warn!(project = %key, error = %e, "Could not write terminal status");
        }
        return;
    }

    if let Err(e) = reporter
        .begin_run(format!("acquiring media for {} keywords", keywords.len()))
        .await
    {
        warn!(project = %key, error = %e, "Could not write initial status");
    }

    match run_inner(&inner, &workspace, platform, &keywords).await {
        Ok(manifest) => {
            info!(
                project = %key,
                media_clips = manifest.media_clips.len(),
                music_clips = manifest.music_clips.len(),
                "Run complete"
            );
            if let Err(e) = reporter
                .complete(format!(
                    "{} media clips, {} music clips",
                    manifest.media_clips.len(),
                    manifest.music_clips.len()
                ))
                .await
            {
                warn!(project = %key, error = %e, "Could not write terminal status");
            }
        }
        Err(e) => {
            error!(project = %key, error = %e, "Run failed");
            if let Err(e) = reporter.fail(e.to_string()).await {
                warn!(project = %key, error = %e, "Could not write terminal status");
            }
        }
    }
    // Guard drops here, releasing the run lock after the terminal status
    // is on disk.
}

async fn run_inner(
    inner: &PipelineInner,
    workspace: &ProjectWorkspace,
    platform: Platform,
    keywords: &[String],
) -> PipelineResult<Manifest> {
    let mut manifest = Manifest::empty(workspace.key().project_id);
    let semaphore = Arc::new(Semaphore::new(inner.config.max_download_parallel.max(1)));

    for keyword in keywords.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
        let mut candidates = collect_candidates(inner, keyword, MediaKind::Image, platform).await;
        if inner.config.fetch_videos {
            candidates.extend(collect_candidates(inner, keyword, MediaKind::Video, platform).await);
        }

        if candidates.is_empty() {
            warn!(keyword = keyword, "No suitable candidates for keyword");
            continue;
        }

        let downloaded = download_all(
            inner,
            &semaphore,
            &candidates,
            &workspace.media_dir(),
            Some(keyword),
        )
        .await;
        for asset in downloaded {
            manifest
                .media_clips
                .push(relative_path(workspace, &asset.local_path));
        }
    }

    let music_query = keywords.join(" ").trim().to_string();
    if !music_query.is_empty() {
        let tracks = collect_candidates(inner, &music_query, MediaKind::Music, platform).await;
        if tracks.is_empty() {
            warn!(query = %music_query, "No music candidates");
        } else {
            let downloaded = download_all(
                inner,
                &semaphore,
                &tracks,
                &workspace.music_dir(),
                Some(&music_query),
            )
            .await;
            for asset in downloaded {
                manifest
                    .music_clips
                    .push(relative_path(workspace, &asset.local_path));
            }
        }
    }

    manifest.dedup_paths();
    ManifestStore::new(workspace.clone()).save(&manifest).await?;
    Ok(manifest)
}

/// Query providers in priority order until the per-keyword quota fills.
///
/// Unsuitable candidates never count against the quota, and a later
/// provider is only consulted when earlier ones left the quota unfilled.
async fn collect_candidates(
    inner: &PipelineInner,
    query: &str,
    kind: MediaKind,
    platform: Platform,
) -> Vec<CandidateAsset> {
    let quota = inner.config.per_keyword_quota;
    let mut out = Vec::new();

    for provider in inner.registry.providers_for(kind) {
        if out.len() >= quota {
            break;
        }
        let found = inner.registry.search_or_empty(provider, query, kind).await;
        for candidate in found {
            if out.len() >= quota {
                break;
            }
            if is_suitable(&candidate, platform) {
                out.push(candidate);
            }
        }
    }
    out
}

/// Download candidates under bounded parallelism, preserving input order.
///
/// Failures are logged and skipped; the returned list holds only the
/// assets that made it to disk.
async fn download_all(
    inner: &PipelineInner,
    semaphore: &Arc<Semaphore>,
    candidates: &[CandidateAsset],
    target_dir: &Path,
    base_name: Option<&str>,
) -> Vec<vwv_models::DownloadedAsset> {
    let futures = candidates.iter().map(|candidate| {
        let semaphore = semaphore.clone();
        async move {
            let _permit = semaphore.acquire().await.ok()?;
            let expected = match candidate.kind {
                MediaKind::Image => ExpectedKind::Image,
                MediaKind::Video => ExpectedKind::Video,
                MediaKind::Music => ExpectedKind::Audio,
            };
            match inner
                .downloader
                .download(&candidate.source_url, target_dir, expected, base_name)
                .await
            {
                Ok(asset) => Some(asset),
                Err(e) => {
                    warn!(
                        url = %candidate.source_url,
                        provider = %candidate.provider,
                        error = %e,
                        "Download failed; skipping asset"
                    );
                    None
                }
            }
        }
    });

    join_all(futures).await.into_iter().flatten().collect()
}

/// Manifest paths are relative to the workspace root.
fn relative_path(workspace: &ProjectWorkspace, local: &Path) -> String {
    local
        .strip_prefix(workspace.root())
        .unwrap_or(local)
        .to_string_lossy()
        .into_owned()
}
