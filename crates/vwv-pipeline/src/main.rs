//! Media acquisition pipeline binary.
//!
//! Usage: `vwv-pipeline <user_id> <project_id> <platform> <keyword>...`
//!
//! Triggers one run for the project and polls the status artifact until
//! it reaches a terminal stage, then prints the manifest.

use std::time::Duration;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vwv_models::{Platform, ProjectKey};
use vwv_pipeline::{Pipeline, PipelineConfig};
use vwv_providers::{ProviderKeys, ProviderRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vwv=info".parse().context("bad log directive")?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let mut args = std::env::args().skip(1);
    let user_id: i64 = args
        .next()
        .context("missing <user_id>")?
        .parse()
        .context("user_id must be an integer")?;
    let project_id: i64 = args
        .next()
        .context("missing <project_id>")?
        .parse()
        .context("project_id must be an integer")?;
    let platform: Platform = args
        .next()
        .context("missing <platform>")?
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let keywords: Vec<String> = args.collect();

    let keys = ProviderKeys::from_env();
    if !keys.any_present() {
        bail!("no provider API keys configured; set PIXABAY_API_KEY, PEXELS_API_KEY, UNSPLASH_API_KEY, or JAMENDO_CLIENT_ID");
    }

    let config = PipelineConfig::from_env();
    info!(workspace_root = %config.workspace_root.display(), "Starting vwv-pipeline");

    let pipeline = Pipeline::new(ProviderRegistry::from_keys(&keys), config);
    let key = ProjectKey::new(user_id, project_id);

    let outcome = pipeline.trigger(key, platform, keywords);
    if !outcome.accepted {
        bail!("trigger rejected: {}", outcome.message);
    }
    info!(project = %key, "Run triggered; polling for completion");

    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let status = pipeline.status(key).await;
        if status.stage.is_terminal() {
            info!(stage = %status.stage, detail = %status.detail, "Run finished");
            break;
        }
    }

    let manifest = pipeline.load_manifest(key).await;
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}
