// ABOUTME: Entry point for the yiyi binary.
// ABOUTME: Loads configuration, prepares the storage medium, and serves the content API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use yiyi_server::{AppState, SiteConfig, create_router};
use yiyi_store::connect;

/// Content service for the yi yi website.
#[derive(Debug, Parser)]
#[command(name = "yiyi", version, about)]
struct Cli {
    /// Socket address to listen on (overrides YIYI_BIND)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Local content directory (overrides YIYI_CONTENT_DIR)
    #[arg(long)]
    content_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("yiyi=debug,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = SiteConfig::from_env().context("invalid configuration")?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(dir) = cli.content_dir {
        config.storage.content_dir = dir;
    }
    config.validate().context("invalid configuration")?;

    tracing::info!("yiyi starting up with {} medium", config.storage.kind);

    let medium = connect(&config.storage).context("failed to set up storage")?;
    if let Err(e) = medium.initialize().await {
        // Reads still degrade to defaults, so keep serving.
        tracing::warn!("storage initialization failed: {}", e);
    }

    let state = Arc::new(AppState::new(medium));
    let app = create_router(state, config.admin_token.clone());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("yiyi shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
