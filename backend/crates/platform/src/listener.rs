//! TCP connection listener
//!
//! Accepts connections until the shutdown signal fires. Accepting is done with a
//! short repeating deadline so the signal is rechecked at least once per
//! [`ACCEPT_POLL_INTERVAL`] even when no client connects.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use kernel::id::ConnectionId;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::Instrument;

use crate::connection::ConnectionHandler;
use crate::shutdown::Shutdown;

/// Deadline applied to each accept attempt
pub const ACCEPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("listen TCP on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("get listened address: {0}")]
    LocalAddr(#[source] std::io::Error),

    #[error("accept connection: {0}")]
    Accept(#[source] std::io::Error),
}

/// Hands every accepted connection to `H` on its own task
pub struct TcpServer<H> {
    listener: TcpListener,
    handler: Arc<H>,
    poll_interval: Duration,
}

impl<H> TcpServer<H>
where
    H: ConnectionHandler + Sync + 'static,
{
    pub async fn bind(addr: &str, handler: H) -> Result<Self, ListenerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ListenerError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            handler: Arc::new(handler),
            poll_interval: ACCEPT_POLL_INTERVAL,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ListenerError> {
        self.listener.local_addr().map_err(ListenerError::LocalAddr)
    }

    /// Accept loop. Returns `Ok(())` once shutdown is observed, closing the socket.
    pub async fn serve(self, shutdown: Shutdown) -> Result<(), ListenerError> {
        let local = self.local_addr()?;
        tracing::info!(host = %local.ip(), port = local.port(), "listening for TCP connections");

        loop {
            if shutdown.is_shutdown() {
                tracing::debug!("close TCP connections listener");
                return Ok(());
            }

            let (stream, peer) =
                match tokio::time::timeout(self.poll_interval, self.listener.accept()).await {
                    // deadline hit, go back and recheck the signal
                    Err(_) => continue,
                    Ok(Err(e)) => return Err(ListenerError::Accept(e)),
                    Ok(Ok(accepted)) => accepted,
                };

            let span = tracing::info_span!("connection", id = %ConnectionId::new(), %peer);
            let handler = Arc::clone(&self.handler);
            let shutdown = shutdown.clone();

            tokio::spawn(
                async move {
                    tracing::debug!("accepted TCP connection");
                    handler.serve(stream, shutdown).await;
                }
                .instrument(span),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Connection;
    use crate::shutdown::ShutdownController;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    /// Echoes one message back and closes
    struct Echo;

    impl ConnectionHandler for Echo {
        async fn serve<C: Connection>(&self, mut conn: C, _shutdown: Shutdown) {
            let mut buf = [0u8; 64];
            if let Ok(n) = conn.read(&mut buf).await {
                let _ = conn.write_all(&buf[..n]).await;
            }
            let _ = conn.shutdown().await;
        }
    }

    /// Holds the first connection until its peer leaves; echoes on the rest
    #[derive(Default)]
    struct StallFirst {
        accepted: AtomicUsize,
    }

    impl ConnectionHandler for StallFirst {
        async fn serve<C: Connection>(&self, mut conn: C, shutdown: Shutdown) {
            if self.accepted.fetch_add(1, Ordering::SeqCst) > 0 {
                return Echo.serve(conn, shutdown).await;
            }
            let mut buf = [0u8; 64];
            while let Ok(n) = conn.read(&mut buf).await {
                if n == 0 {
                    break;
                }
            }
        }
    }

    async fn start<H: ConnectionHandler + Sync + 'static>(
        handler: H,
    ) -> (
        SocketAddr,
        ShutdownController,
        tokio::task::JoinHandle<Result<(), ListenerError>>,
    ) {
        let server = TcpServer::bind("127.0.0.1:0", handler)
            .await
            .unwrap()
            .with_poll_interval(Duration::from_millis(20));
        let addr = server.local_addr().unwrap();
        let controller = ShutdownController::new();
        let task = tokio::spawn(server.serve(controller.subscribe()));
        (addr, controller, task)
    }

    #[tokio::test]
    async fn test_accepted_connection_is_handed_to_handler() {
        let (addr, controller, task) = start(Echo).await;

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"hello").await.unwrap();
        let mut buf = [0u8; 16];
        let n = client.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"hello");

        controller.shutdown();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_stalled_client_does_not_block_others() {
        let (addr, controller, task) = start(StallFirst::default()).await;

        let mut stalled = TcpStream::connect(addr).await.unwrap();
        stalled.write_all(b"waiting").await.unwrap();

        let echoed = tokio::time::timeout(Duration::from_secs(1), async {
            let mut client = TcpStream::connect(addr).await.unwrap();
            client.write_all(b"hello").await.unwrap();
            let mut buf = [0u8; 16];
            let n = client.read(&mut buf).await.unwrap();
            buf[..n].to_vec()
        })
        .await;
        assert_eq!(echoed.unwrap(), b"hello");

        // the first connection is still held by its handler
        let mut buf = [0u8; 1];
        let pending = tokio::time::timeout(Duration::from_millis(50), stalled.read(&mut buf)).await;
        assert!(pending.is_err());

        controller.shutdown();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_observed_without_traffic() {
        let (_addr, controller, task) = start(Echo).await;

        controller.shutdown();
        let stopped = tokio::time::timeout(Duration::from_secs(1), task).await;
        assert!(matches!(stopped, Ok(Ok(Ok(())))));
    }

    #[tokio::test]
    async fn test_bind_error_is_reported() {
        let (addr, controller, task) = start(Echo).await;

        let result = TcpServer::bind(&addr.to_string(), Echo).await;
        assert!(matches!(result, Err(ListenerError::Bind { .. })));

        controller.shutdown();
        task.await.unwrap().unwrap();
    }
}
