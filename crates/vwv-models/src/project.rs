//! Project identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Multi-tenant identity for a pipeline run: one user, one project.
///
/// Used as the key for the run lock, the status record, and the
/// per-project workspace directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectKey {
    /// Owning user ID.
    pub user_id: i64,
    /// Project ID within that user's account.
    pub project_id: i64,
}

impl ProjectKey {
    pub fn new(user_id: i64, project_id: i64) -> Self {
        Self {
            user_id,
            project_id,
        }
    }

    /// Workspace directory name for this key, e.g. `workspace_u1_p66`.
    ///
    /// Matches the layout consumed by the serving layer.
    pub fn workspace_dir_name(&self) -> String {
        format!("workspace_u{}_p{}", self.user_id, self.project_id)
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}/p{}", self.user_id, self.project_id)
    }
}
