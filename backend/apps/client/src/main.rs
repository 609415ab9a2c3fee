//! Word of Wisdom Client Entry Point

mod config;
mod session;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ClientConfig;
use crate::session::Reply;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(server = %config.server_addr, "client settings");

    let mut stream = TcpStream::connect(&config.server_addr)
        .await
        .with_context(|| format!("dial TCP {}", config.server_addr))?;

    let session = session::run(&mut stream).await;

    tracing::debug!("close TCP connection");
    if let Err(e) = stream.shutdown().await {
        tracing::debug!(error = %e, "close TCP connection");
    }

    match session? {
        Reply::Answer(answer) => tracing::info!(answer = %answer, "got a word of wisdom"),
        Reply::Interrupted(message) => {
            tracing::warn!(message = %message, "server ended the session during PoW")
        }
    }

    Ok(())
}
