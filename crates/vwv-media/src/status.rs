//! Pollable pipeline status artifact.

use std::sync::Mutex;

use tracing::{info, warn};

use vwv_models::{PipelineStage, StatusRecord};

use crate::error::MediaResult;
use crate::workspace::{write_atomic, ProjectWorkspace};

/// Records coarse stage transitions for one run.
///
/// One reporter exists per run (the run lock guarantees a single writer);
/// it tracks the current stage in memory and refuses backward transitions,
/// so a run can never report `complete -> processing`. A new run creates a
/// fresh reporter and re-enters `processing` regardless of the previous
/// run's terminal stage.
pub struct StatusReporter {
    workspace: ProjectWorkspace,
    current: Mutex<PipelineStage>,
}

impl StatusReporter {
    pub fn new(workspace: ProjectWorkspace) -> Self {
        Self {
            workspace,
            current: Mutex::new(PipelineStage::Idle),
        }
    }

    /// Read the persisted record; absent or malformed files poll as idle.
    pub async fn read(workspace: &ProjectWorkspace) -> StatusRecord {
        let bytes = match tokio::fs::read(workspace.status_path()).await {
            Ok(b) => b,
            Err(_) => return StatusRecord::idle(),
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|_| StatusRecord::idle())
    }

    /// Enter `processing` at the start of a run.
    pub async fn begin_run(&self, detail: impl Into<String>) -> MediaResult<()> {
        self.write_stage(PipelineStage::Processing, detail.into())
            .await
    }

    /// Terminal success.
    pub async fn complete(&self, detail: impl Into<String>) -> MediaResult<()> {
        self.write_stage(PipelineStage::Complete, detail.into())
            .await
    }

    /// Terminal failure with the error detail.
    pub async fn fail(&self, detail: impl Into<String>) -> MediaResult<()> {
        self.write_stage(PipelineStage::Error, detail.into()).await
    }

    async fn write_stage(&self, stage: PipelineStage, detail: String) -> MediaResult<()> {
        {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            if !current.can_transition_to(stage) {
                warn!(
                    project = %self.workspace.key(),
                    from = %*current,
                    to = %stage,
                    "Refusing backward status transition"
                );
                return Ok(());
            }
            *current = stage;
        }

        let record = StatusRecord::new(stage, detail);
        let bytes = serde_json::to_vec_pretty(&record)?;
        write_atomic(&self.workspace.status_path(), &bytes).await?;

        info!(project = %self.workspace.key(), stage = %stage, "Status updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vwv_models::ProjectKey;

    async fn reporter(base: &std::path::Path) -> StatusReporter {
        let ws = ProjectWorkspace::new(base, ProjectKey::new(1, 9));
        ws.ensure_dirs().await.unwrap();
        StatusReporter::new(ws)
    }

    #[tokio::test]
    async fn test_read_absent_record_is_idle() {
        let base = tempfile::tempdir().unwrap();
        let ws = ProjectWorkspace::new(base.path(), ProjectKey::new(1, 9));
        let record = StatusReporter::read(&ws).await;
        assert_eq!(record.stage, PipelineStage::Idle);
    }

    #[tokio::test]
    async fn test_processing_to_complete() {
        let base = tempfile::tempdir().unwrap();
        let r = reporter(base.path()).await;

        r.begin_run("run started").await.unwrap();
        let record = StatusReporter::read(&r.workspace).await;
        assert_eq!(record.stage, PipelineStage::Processing);

        r.complete("done").await.unwrap();
        let record = StatusReporter::read(&r.workspace).await;
        assert_eq!(record.stage, PipelineStage::Complete);
        assert_eq!(record.detail, "done");
    }

    #[tokio::test]
    async fn test_backward_transition_is_not_written() {
        let base = tempfile::tempdir().unwrap();
        let r = reporter(base.path()).await;

        r.begin_run("run started").await.unwrap();
        r.complete("done").await.unwrap();
        // Same run: going back to processing must be a no-op.
        r.begin_run("again").await.unwrap();

        let record = StatusReporter::read(&r.workspace).await;
        assert_eq!(record.stage, PipelineStage::Complete);
        assert_eq!(record.detail, "done");
    }

    #[tokio::test]
    async fn test_new_run_reenters_processing_after_error() {
        let base = tempfile::tempdir().unwrap();
        let r = reporter(base.path()).await;
        r.begin_run("first run").await.unwrap();
        r.fail("disk full").await.unwrap();

        // New run: fresh reporter over the same workspace.
        let ws = ProjectWorkspace::new(base.path(), ProjectKey::new(1, 9));
        let r2 = StatusReporter::new(ws);
        r2.begin_run("second run").await.unwrap();

        let record = StatusReporter::read(&r2.workspace).await;
        assert_eq!(record.stage, PipelineStage::Processing);
    }
}
