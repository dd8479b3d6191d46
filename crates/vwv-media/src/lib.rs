//! Asset downloading and pipeline artifacts.
//!
//! This crate owns the I/O half of the pipeline:
//! - [`download::Downloader`]: fetch one candidate URL with bounded
//!   timeout, detect its true content type, and write it under a
//!   collision-safe name.
//! - [`workspace::ProjectWorkspace`]: the per-(user, project) directory
//!   layout consumed by the serving layer.
//! - [`manifest::ManifestStore`]: atomic load/save of the project
//!   manifest.
//! - [`status::StatusReporter`]: the pollable stage artifact.

pub mod download;
pub mod error;
pub mod manifest;
pub mod status;
pub mod workspace;

pub use download::{Downloader, ExpectedKind};
pub use error::{MediaError, MediaResult};
pub use manifest::ManifestStore;
pub use status::StatusReporter;
pub use workspace::ProjectWorkspace;
