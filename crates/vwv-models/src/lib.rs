//! Shared data models for the VideoWithVoiceover media pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Project identity (user + project keys)
//! - Media kinds, providers, and asset descriptors
//! - Target publishing platforms and aspect classes
//! - The per-project manifest contract
//! - Pipeline status records for polling

pub mod asset;
pub mod manifest;
pub mod platform;
pub mod project;
pub mod query;
pub mod status;

// Re-export common types
pub use asset::{CandidateAsset, DownloadedAsset, MediaKind, ProviderId};
pub use manifest::Manifest;
pub use platform::{AspectClass, Platform};
pub use project::ProjectKey;
pub use query::SearchQuery;
pub use status::{PipelineStage, StatusRecord};
