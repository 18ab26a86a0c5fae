//! KodiVoice - Voice-friendly HTTP control for Kodi
//!
//! Serves the request endpoints and forwards resolved commands to Kodi.

use anyhow::{Context, Result};
use clap::Parser;
use kodivoice::config::Config;
use kodivoice::core::TextNormalizer;
use kodivoice::players::KodiClient;
use kodivoice::processor::Processor;
use kodivoice::server::create_router;
use kodivoice::utils::FuzzyMatcher;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The log level lives in the config, so warnings raised while loading
    // it go through a temporary subscriber
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    })
    .context("Failed to load config")?;

    // Setup logging
    let level = if args.verbose {
        "debug".to_string()
    } else {
        config.log_level.to_lowercase()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🎬 KodiVoice v{} starting...", env!("CARGO_PKG_VERSION"));

    let client = KodiClient::new(&config).context("Failed to create Kodi client")?;
    info!("📡 Using Kodi at {}", client.url());

    let processor = Processor::new(
        Arc::new(client),
        FuzzyMatcher::new(config.match_config()),
        TextNormalizer::new(config.voice_corrections.clone()),
    )
    .with_tv_activation(config.activate_tv_on_play);

    if !processor.device_reachable().await {
        warn!("⚠️ Kodi is not answering yet; requests will fail until it is");
    }

    let app = create_router(Arc::new(processor));

    let port = args.port.unwrap_or(config.listen_port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("✅ KodiVoice listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
