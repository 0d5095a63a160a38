//! lpf-gen - LinkedIn Post Factory content generator service
//!
//! Composes an LLM provider, a news API, and an object store into a flat
//! set of content-generation endpoints. See lib.rs for the router.

use anyhow::Result;
use clap::Parser;
use lpf_gen::config::Config;
use lpf_gen::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for lpf-gen
#[derive(Parser, Debug)]
#[command(name = "lpf-gen")]
#[command(about = "Content generator service for the LinkedIn Post Factory")]
#[command(version)]
struct Args {
    /// Socket address to listen on
    #[arg(short, long, env = "LPF_BIND")]
    bind: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, env = "LPF_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting LPF Content Generator (lpf-gen) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = Config::resolve(args.bind.as_deref(), args.config.as_deref())?;

    info!(
        "Providers: gemini={} newsapi={} storage={}",
        config.google_api_key.is_some(),
        config.newsapi_key.is_some(),
        config.storage_configured()
    );

    let bind = config.bind;
    let state = AppState::from_config(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("lpf-gen listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
