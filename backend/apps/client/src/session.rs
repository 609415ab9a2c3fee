//! One client session against the PoW gate
//!
//! ping, read challenge, mine, send result, read the answer. While mining the
//! socket stays watched: any server message at that point (deadline notice,
//! shutdown notice) ends the session.

use std::io;

use pow::PowError;
use pow::application::config::READ_BUFFER_SIZE;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio::time::Instant;

/// Initiation message; the server ignores its content
pub const PING: &[u8] = b"ping";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("ping server: {0}")]
    Ping(#[source] io::Error),

    #[error("read PoW challenge: {0}")]
    ReadChallenge(#[source] io::Error),

    #[error("server closed the connection before sending a challenge")]
    NoChallenge,

    #[error("calculate PoW result: {0}")]
    Calculate(#[from] PowError),

    #[error("PoW worker stopped without a result")]
    WorkerGone,

    #[error("read while calculating PoW result: {0}")]
    ReadDuringCalculation(#[source] io::Error),

    #[error("send PoW result: {0}")]
    SendResult(#[source] io::Error),

    #[error("read server answer: {0}")]
    ReadAnswer(#[source] io::Error),
}

/// How the server ended the session
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    /// Server's message after the result was sent (the quote on success)
    Answer(String),
    /// Server spoke up before the result was ready
    Interrupted(String),
}

pub async fn run<S>(stream: &mut S) -> Result<Reply, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    tracing::info!("ping server");
    stream.write_all(PING).await.map_err(SessionError::Ping)?;

    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let n = stream
        .read(&mut buf)
        .await
        .map_err(SessionError::ReadChallenge)?;
    if n == 0 {
        return Err(SessionError::NoChallenge);
    }
    let challenge = String::from_utf8_lossy(&buf[..n]).into_owned();
    tracing::info!(challenge = %challenge, "got PoW challenge");

    // Mining cannot be interrupted, so it runs on a detached thread that is
    // simply left behind if the server speaks first.
    let started = Instant::now();
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let _ = tx.send(pow::calculate(&challenge));
    });

    let result = tokio::select! {
        mined = rx => mined.map_err(|_| SessionError::WorkerGone)??,
        read = stream.read(&mut buf) => {
            let n = read.map_err(SessionError::ReadDuringCalculation)?;
            let message = String::from_utf8_lossy(&buf[..n]).into_owned();
            tracing::info!(message = %message, "got a message from server");
            return Ok(Reply::Interrupted(message));
        }
    };

    tracing::info!(
        result = %result,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "PoW result calculated"
    );
    stream
        .write_all(result.as_bytes())
        .await
        .map_err(SessionError::SendResult)?;

    let n = stream
        .read(&mut buf)
        .await
        .map_err(SessionError::ReadAnswer)?;
    Ok(Reply::Answer(String::from_utf8_lossy(&buf[..n]).into_owned()))
}
