// Draft simulator server entry point.
//
// Startup sequence:
// 1. Load config (copying defaults on first run)
// 2. Initialize tracing (log to file)
// 3. Load the prospect catalog
// 4. Bind the WebSocket listener and serve until Ctrl+C

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use draftsim_core::catalog::loader;
use draftsim_core::DraftEngine;
use draftsim_server::config::{self, LoggingConfig};
use draftsim_server::ws_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;
    info!("Draft simulator starting up");

    // 3. Load the catalog
    let catalog = loader::load_catalog(&config.data).with_context(|| {
        format!(
            "failed to load prospects from {}",
            config.data.prospects.display()
        )
    })?;
    info!(
        "Loaded {} players across {} draft years",
        catalog.player_count(),
        catalog.years().len()
    );
    let engine = Arc::new(DraftEngine::new(Arc::new(catalog)));

    // 4. Serve
    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind WebSocket server on {addr}"))?;

    tokio::select! {
        result = ws_server::run(listener, engine) => {
            if let Err(e) = &result {
                error!("WebSocket server error: {}", e);
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    info!("Draft simulator shut down cleanly");
    Ok(())
}

/// Initialize tracing to write to `draftsim.log` under the configured directory.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir: &Path = &logging.dir;
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("draftsim.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
