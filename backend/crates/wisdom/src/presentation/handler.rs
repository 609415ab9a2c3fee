//! Word of Wisdom connection handler

use std::sync::Arc;

use platform::connection::{Connection, ConnectionHandler};
use platform::shutdown::{CONTEXT_DONE_NOTICE, Shutdown};
use tokio::io::AsyncWriteExt;

use crate::application::service::WordOfWisdomService;
use crate::domain::repository::QuoteStore;

pub const NO_QUOTE_NOTICE: &str = "cannot get a quote";

/// Writes one quote to the peer and closes the connection
pub struct WordOfWisdomHandler<S> {
    service: Arc<WordOfWisdomService<S>>,
}

impl<S> WordOfWisdomHandler<S> {
    pub fn new(service: Arc<WordOfWisdomService<S>>) -> Self {
        Self { service }
    }
}

impl<S> Clone for WordOfWisdomHandler<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S> ConnectionHandler for WordOfWisdomHandler<S>
where
    S: QuoteStore + Sync + 'static,
{
    async fn serve<C: Connection>(&self, mut conn: C, mut shutdown: Shutdown) {
        let message = tokio::select! {
            biased;
            _ = shutdown.wait() => {
                tracing::warn!("shutdown before quote was sent");
                CONTEXT_DONE_NOTICE.to_string()
            }
            quote = self.service.quote() => match quote {
                Ok(quote) => quote,
                Err(e) => {
                    tracing::error!(error = %e, "get quote");
                    NO_QUOTE_NOTICE.to_string()
                }
            },
        };

        tracing::info!(message = %message, "write message");
        if let Err(e) = conn.write_all(message.as_bytes()).await {
            tracing::error!(error = %e, "write message");
        }

        tracing::debug!("close TCP connection");
        if let Err(e) = conn.shutdown().await {
            tracing::debug!(error = %e, "close TCP connection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::embedded::EmbeddedQuotes;
    use platform::connection::PeerStream;
    use platform::shutdown::ShutdownController;
    use tokio_test::io::Builder;

    async fn handler(json: &str) -> WordOfWisdomHandler<EmbeddedQuotes> {
        let store = Arc::new(EmbeddedQuotes::from_json(json).unwrap());
        let service = WordOfWisdomService::new(store).await.unwrap();
        WordOfWisdomHandler::new(Arc::new(service))
    }

    #[tokio::test]
    async fn test_writes_quote() {
        let handler = handler(r#"{"quotes": [{"id": "only", "text": "quote_1"}]}"#).await;
        let controller = ShutdownController::new();
        let mock = Builder::new().write(b"quote_1").build();

        handler
            .serve(PeerStream::new(mock, "mock"), controller.subscribe())
            .await;
    }

    #[tokio::test]
    async fn test_empty_store_writes_notice() {
        let handler = handler(r#"{"quotes": []}"#).await;
        let controller = ShutdownController::new();
        let mock = Builder::new().write(NO_QUOTE_NOTICE.as_bytes()).build();

        handler
            .serve(PeerStream::new(mock, "mock"), controller.subscribe())
            .await;
    }

    #[tokio::test]
    async fn test_shutdown_wins_over_quote() {
        let handler = handler(r#"{"quotes": [{"id": "only", "text": "quote_1"}]}"#).await;
        let controller = ShutdownController::new();
        controller.shutdown();
        let mock = Builder::new().write(CONTEXT_DONE_NOTICE.as_bytes()).build();

        handler
            .serve(PeerStream::new(mock, "mock"), controller.subscribe())
            .await;
    }
}
