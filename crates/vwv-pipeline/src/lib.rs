//! Media acquisition pipeline orchestration.
//!
//! The [`Pipeline`] composes the provider registry, suitability filter,
//! downloader, manifest store, and status reporter into one run per
//! trigger: for each keyword it queries providers in priority order,
//! filters candidates for the target platform, downloads survivors under
//! bounded parallelism, then queries music once for the whole project and
//! persists the manifest.
//!
//! At most one run is active per (user, project) at any time, enforced by
//! [`RunLockRegistry`]; concurrent triggers for the same project are
//! rejected, never queued.

pub mod config;
pub mod error;
pub mod filter;
pub mod orchestrator;
pub mod run_lock;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use filter::is_suitable;
pub use orchestrator::{Pipeline, TriggerOutcome};
pub use run_lock::{RunGuard, RunLockRegistry};
