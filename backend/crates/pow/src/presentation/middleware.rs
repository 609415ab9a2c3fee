//! PoW Middleware
//!
//! [`ProofOfWork`] puts a Hashcash exchange in front of another
//! [`ConnectionHandler`]:
//!
//! 1. read the peer's opening message (its content is ignored)
//! 2. write a challenge header
//! 3. wait for the result, the deadline, or shutdown, whichever comes first
//! 4. on a valid result hand the still-open connection to the next handler
//!
//! Any other path writes one short notice and closes the connection.

use std::sync::Arc;

use kernel::error::app_error::AppError;
use platform::connection::{Connection, ConnectionHandler};
use platform::shutdown::{CONTEXT_DONE_NOTICE, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::Instrument;

use crate::application::config::{PowConfig, READ_BUFFER_SIZE};
use crate::application::issue_challenge::IssueChallengeUseCase;
use crate::application::submit_solution::{Submission, SubmitSolutionUseCase};
use crate::domain::services::{self, ChallengeFn, VerifyFn};
use crate::error::{PowError, PowResult};

pub const VERIFICATION_FAILED_NOTICE: &str = "PoW verification failed";
pub const INTERNAL_ERROR_NOTICE: &str = "internal error on verifying PoW";

/// How a gated session ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// Result verified; the connection went to the next handler
    Passed,
    /// Rejected or broken
    Failed(AppError),
    /// Deadline or shutdown fired before a result arrived
    TimedOut,
    /// Peer closed the connection first
    Disconnected,
}

/// PoW gate wrapping the handler `H`
pub struct ProofOfWork<H> {
    next: H,
    config: Arc<PowConfig>,
    challenge: ChallengeFn,
    verify: VerifyFn,
}

impl<H> ProofOfWork<H>
where
    H: ConnectionHandler + Sync,
{
    pub fn new(next: H, config: PowConfig) -> PowResult<Self> {
        config.validate()?;
        Ok(Self {
            next,
            config: Arc::new(config),
            challenge: services::challenge,
            verify: services::verify,
        })
    }

    /// Replace the challenge generator
    pub fn with_challenge(mut self, challenge: ChallengeFn) -> Self {
        self.challenge = challenge;
        self
    }

    /// Replace the result verifier
    pub fn with_verify(mut self, verify: VerifyFn) -> Self {
        self.verify = verify;
        self
    }

    /// Run one gated session to completion
    pub async fn handle<C: Connection>(&self, conn: C, mut shutdown: Shutdown) -> SessionOutcome {
        let (mut reader, mut writer) = tokio::io::split(conn);

        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        let read = tokio::select! {
            biased;
            _ = shutdown.wait() => return context_done(&mut writer).await,
            read = reader.read(&mut buf) => read,
        };
        match read {
            // half-closed peers still get a challenge; the result read sees the EOF
            Ok(0) => tracing::debug!("peer closed its side before asking for a challenge"),
            Ok(n) => tracing::info!(message = %String::from_utf8_lossy(&buf[..n]), "got message"),
            Err(e) => return reject(&mut writer, PowError::Transport(e)).await,
        }

        let issued = match IssueChallengeUseCase::new(Arc::clone(&self.config), self.challenge)
            .execute()
        {
            Ok(issued) => issued,
            Err(e) => return reject(&mut writer, e).await,
        };
        if let Err(e) = write_message(&mut writer, &issued.header).await {
            let e = PowError::Transport(e);
            e.log();
            close(&mut writer).await;
            return SessionOutcome::Failed(e.into());
        }

        // The read runs on its own task so the deadline can cut it short.
        // Aborting it drops the read half, which closes the connection.
        let (tx, rx) = oneshot::channel();
        let submit = SubmitSolutionUseCase::new(self.verify);
        let challenge = issued.header;
        let reading = tokio::spawn(
            async move {
                let submission = submit.execute(&mut reader, &challenge).await;
                let _ = tx.send((submission, reader));
            }
            .in_current_span(),
        );

        let received = tokio::select! {
            _ = tokio::time::sleep(self.config.wait_pow) => {
                tracing::warn!(wait_ms = self.config.wait_pow_ms(), "PoW deadline exceeded");
                reading.abort();
                return context_done(&mut writer).await;
            }
            _ = shutdown.wait() => {
                tracing::warn!("shutdown while waiting for PoW result");
                reading.abort();
                return context_done(&mut writer).await;
            }
            received = rx => received,
        };
        let Ok((submission, reader)) = received else {
            tracing::error!("PoW reader task ended without a result");
            notify_and_close(&mut writer, INTERNAL_ERROR_NOTICE).await;
            return SessionOutcome::Failed(AppError::internal(
                "PoW reader task ended without a result",
            ));
        };

        match submission {
            Submission::Disconnected => {
                tracing::info!("peer closed before sending a result");
                close(&mut writer).await;
                SessionOutcome::Disconnected
            }
            Submission::Verified { valid: true, .. } => {
                tracing::info!("PoW verification passed");
                let conn = reader.unsplit(writer);
                self.next.serve(conn, shutdown).await;
                SessionOutcome::Passed
            }
            Submission::Verified { valid: false, header } => {
                tracing::warn!(header = %header, "PoW verification failed");
                notify_and_close(&mut writer, VERIFICATION_FAILED_NOTICE).await;
                SessionOutcome::Failed(AppError::verification_failed(
                    "digest does not meet the difficulty target",
                ))
            }
            Submission::Failed(e) => reject(&mut writer, e).await,
        }
    }
}

impl<H> ConnectionHandler for ProofOfWork<H>
where
    H: ConnectionHandler + Sync,
{
    async fn serve<C: Connection>(&self, conn: C, shutdown: Shutdown) {
        let started = Instant::now();
        let outcome = self.handle(conn, shutdown).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &outcome {
            SessionOutcome::Passed => tracing::info!(elapsed_ms, "PoW session passed"),
            SessionOutcome::Failed(e) if e.is_server_error() => {
                tracing::error!(error = %e, elapsed_ms, "PoW session failed")
            }
            SessionOutcome::Failed(e) if e.is_peer_fault() => {
                tracing::warn!(error = %e, elapsed_ms, "PoW session rejected")
            }
            SessionOutcome::Failed(e) => {
                tracing::info!(error = %e, elapsed_ms, "PoW session broken")
            }
            SessionOutcome::TimedOut => tracing::warn!(elapsed_ms, "PoW session timed out"),
            SessionOutcome::Disconnected => tracing::debug!(elapsed_ms, "PoW session abandoned"),
        }
    }
}

/// Notice for a failed check; a result for another challenge counts as a
/// failed verification rather than an internal fault
fn notice_for(err: &PowError) -> &'static str {
    match err {
        PowError::ChallengeMismatch => VERIFICATION_FAILED_NOTICE,
        _ => INTERNAL_ERROR_NOTICE,
    }
}

async fn reject<W>(writer: &mut W, err: PowError) -> SessionOutcome
where
    W: AsyncWrite + Unpin,
{
    err.log();
    notify_and_close(writer, notice_for(&err)).await;
    SessionOutcome::Failed(err.into())
}

async fn context_done<W>(writer: &mut W) -> SessionOutcome
where
    W: AsyncWrite + Unpin,
{
    notify_and_close(writer, CONTEXT_DONE_NOTICE).await;
    SessionOutcome::TimedOut
}

async fn write_message<W>(writer: &mut W, message: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    tracing::debug!(message, "write message");
    writer.write_all(message.as_bytes()).await?;
    writer.flush().await
}

/// Best effort: a peer that already left cannot be told anything
async fn notify_and_close<W>(writer: &mut W, notice: &str)
where
    W: AsyncWrite + Unpin,
{
    if let Err(e) = write_message(writer, notice).await {
        tracing::debug!(error = %e, notice, "write notice");
    }
    close(writer).await;
}

async fn close<W>(writer: &mut W)
where
    W: AsyncWrite + Unpin,
{
    tracing::debug!("close TCP connection");
    if let Err(e) = writer.shutdown().await {
        tracing::debug!(error = %e, "close connection");
    }
}
