use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tvs::config::Config;
use tvs::{ProgressReconciler, TrackerClient};

fn init_tracing() {
    // RUST_LOG environment variable controls log levels
    // Default: info for our crate, warn for dependencies
    // Logs go to stderr, stdout carries the JSON result
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tvs=info,tvs_protocol=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded successfully");
    tracing::debug!("Tracker: {:?}", config.tracker);

    let client = TrackerClient::new_shared(&config.tracker)
        .context("Failed to create tracker client")?;
    let reconciler = ProgressReconciler::new(client);

    let language = &config.progress.language;
    let incomplete = reconciler
        .compute_incomplete_seasons(language)
        .await
        .with_context(|| format!("Failed to reconcile progress for language {}", language))?;

    let output = serde_json::to_string_pretty(&incomplete)?;
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize tracing first so we can log configuration loading
    init_tracing();

    tracing::info!("Starting TVS v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
