//! Single-flight run locking keyed by (user, project).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use vwv_models::ProjectKey;

type LockMap = Arc<Mutex<HashMap<ProjectKey, DateTime<Utc>>>>;

/// Registry of currently active pipeline runs.
///
/// Acquisition is an atomic insert-if-absent under one mutex shared by
/// all callers, so two concurrent triggers for the same project can never
/// both succeed. The key space is the only process-wide mutable state of
/// the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RunLockRegistry {
    active: LockMap,
}

impl RunLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to acquire the run lock for a project.
    ///
    /// Returns a guard that releases on drop, or `None` when a run is
    /// already active for the key.
    pub fn try_acquire(&self, key: ProjectKey) -> Option<RunGuard> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        match active.entry(key) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                debug!(
                    project = %key,
                    started_at = %entry.get(),
                    "Run lock already held"
                );
                None
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(Utc::now());
                info!(project = %key, "Run lock acquired");
                Some(RunGuard {
                    active: self.active.clone(),
                    key,
                    released: false,
                })
            }
        }
    }

    /// Release the lock for a key. Idempotent: releasing a key that was
    /// never acquired is a no-op.
    pub fn release(&self, key: ProjectKey) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active.remove(&key).is_some() {
            info!(project = %key, "Run lock released");
        }
    }

    /// Whether a run is currently active for the key.
    pub fn is_active(&self, key: ProjectKey) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&key)
    }

    /// When the active run for the key started, if any.
    pub fn active_since(&self, key: ProjectKey) -> Option<DateTime<Utc>> {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .copied()
    }
}

/// Holds the run lock for one pipeline run.
///
/// Releases on drop, so every exit path of a run (success, failure,
/// panic unwind) releases exactly once.
#[derive(Debug)]
pub struct RunGuard {
    active: LockMap,
    key: ProjectKey,
    released: bool,
}

impl RunGuard {
    pub fn key(&self) -> ProjectKey {
        self.key
    }

    /// Release explicitly; dropping does the same.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if !self.released {
            self.released = true;
            let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
            if active.remove(&self.key).is_some() {
                info!(project = %self.key, "Run lock released");
            }
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.release_inner();
    }
}
