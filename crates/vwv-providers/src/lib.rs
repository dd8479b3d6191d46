//! Stock-media provider search clients.
//!
//! One client per provider (Pixabay, Pexels, Unsplash, Jamendo), each
//! translating a query string into a uniform list of
//! [`vwv_models::CandidateAsset`]s.
//! Clients own their provider's authentication and response parsing;
//! failures are classified and surfaced as [`ProviderError`], and the
//! registry-level search path degrades them to empty results so one
//! provider going down never aborts a pipeline run.
//!
//! API keys are read once at startup into [`ProviderKeys`] and injected
//! into the [`ProviderRegistry`]; a provider without a key is simply not
//! registered.

pub mod client;
pub mod config;
pub mod error;
pub mod jamendo;
pub mod pexels;
pub mod pixabay;
pub mod registry;
pub mod unsplash;

pub use client::SearchProvider;
pub use config::ProviderKeys;
pub use error::{ProviderError, ProviderResult};
pub use jamendo::JamendoClient;
pub use pexels::PexelsClient;
pub use pixabay::PixabayClient;
pub use registry::ProviderRegistry;
pub use unsplash::UnsplashClient;
