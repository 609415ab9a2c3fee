//! Word of Wisdom Server Entry Point
//!
//! Uses `anyhow` for startup errors; per-connection failures are handled and
//! logged inside the handlers and never reach `main`.

mod config;

use std::sync::Arc;
use std::time::Duration;

use platform::listener::TcpServer;
use platform::shutdown::ShutdownController;
use pow::ProofOfWork;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wisdom::{EmbeddedQuotes, WordOfWisdomHandler, WordOfWisdomService};

use crate::config::ServerConfig;

/// How long the listener gets to notice shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        tcp_addr = %config.tcp_addr,
        complexity = config.complexity,
        wait_pow_ms = config.wait_pow_ms,
        "server settings"
    );

    let quotes = Arc::new(EmbeddedQuotes::bundled()?);
    let service = WordOfWisdomService::new(quotes).await?;
    let handler = WordOfWisdomHandler::new(Arc::new(service));
    let gate = ProofOfWork::new(handler, config.pow_config())?;
    let server = TcpServer::bind(&config.tcp_addr, gate).await?;

    let controller = ShutdownController::new();
    let mut listener = tokio::spawn(server.serve(controller.subscribe()));

    tokio::select! {
        signal = controller.wait_for_signal() => signal?,
        stopped = &mut listener => {
            stopped??;
            tracing::warn!("listener stopped without a shutdown signal");
            return Ok(());
        }
    }

    match tokio::time::timeout(SHUTDOWN_GRACE, listener).await {
        Ok(stopped) => stopped??,
        Err(_) => tracing::warn!("listener did not stop within the grace period"),
    }

    tracing::info!("server stopped");
    Ok(())
}
