//! Pipeline status records for polling.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse-grained pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// No run has happened yet for this project.
    #[default]
    Idle,
    /// A run is actively acquiring and downloading media.
    Processing,
    /// The last run finished and the manifest was persisted.
    Complete,
    /// The last run hit a fatal error (manifest persistence failed).
    Error,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Processing => "processing",
            PipelineStage::Complete => "complete",
            PipelineStage::Error => "error",
        }
    }

    /// Terminal stages receive no further updates within a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Complete | PipelineStage::Error)
    }

    /// Whether `next` is a legal transition within a single run.
    ///
    /// Allowed: `Idle -> Processing`, `Processing -> Complete`,
    /// `Processing -> Error`. A new run re-enters `Processing` from any
    /// terminal stage, but never moves backward inside the same run.
    pub fn can_transition_to(&self, next: PipelineStage) -> bool {
        match (self, next) {
            (PipelineStage::Idle, PipelineStage::Processing) => true,
            (PipelineStage::Processing, PipelineStage::Complete) => true,
            (PipelineStage::Processing, PipelineStage::Error) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pollable status artifact for one (user, project).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Current stage.
    pub stage: PipelineStage,
    /// Free-text detail, e.g. the error message on failure.
    #[serde(default)]
    pub detail: String,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl StatusRecord {
    pub fn new(stage: PipelineStage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            detail: detail.into(),
            updated_at: Utc::now(),
        }
    }

    /// The record returned to pollers when no run has ever happened.
    pub fn idle() -> Self {
        Self::new(PipelineStage::Idle, "")
    }
}

impl Default for StatusRecord {
    fn default() -> Self {
        Self::idle()
    }
}
