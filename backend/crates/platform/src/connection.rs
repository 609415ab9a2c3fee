//! Stream connection abstractions
//!
//! A [`Connection`] is any bidirectional byte stream that knows who is on the
//! other end. A [`ConnectionHandler`] takes over an accepted connection; handlers
//! chain by owning the next handler and passing the live connection along.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;

use crate::shutdown::Shutdown;

/// Generic stream-oriented network connection
pub trait Connection: AsyncRead + AsyncWrite + Unpin + Send + 'static {
    /// Human-readable remote address, used for logging only
    fn peer(&self) -> String;
}

impl Connection for TcpStream {
    fn peer(&self) -> String {
        self.peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

/// Serves one accepted connection
#[trait_variant::make(ConnectionHandler: Send)]
pub trait LocalConnectionHandler {
    /// Take ownership of the connection until the exchange is over.
    ///
    /// `shutdown` is the process-wide cancellation signal; handlers observe it
    /// cooperatively and are not interrupted by it.
    async fn serve<C: Connection>(&self, conn: C, shutdown: Shutdown);
}

/// Any byte stream tagged with a fixed peer label
///
/// Lets in-memory streams (duplex pipes, scripted mocks) stand in for sockets.
#[derive(Debug)]
pub struct PeerStream<S> {
    inner: S,
    peer: String,
}

impl<S> PeerStream<S> {
    pub fn new(inner: S, peer: impl Into<String>) -> Self {
        Self {
            inner,
            peer: peer.into(),
        }
    }
}

impl<S> Connection for PeerStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    fn peer(&self) -> String {
        self.peer.clone()
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for PeerStream<S> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for PeerStream<S> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}
