//! Submit Solution Use Case
//!
//! Reads the peer's result in a single read and checks it against the issued
//! challenge. Message framing relies on each write arriving whole.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::application::config::READ_BUFFER_SIZE;
use crate::domain::services::VerifyFn;
use crate::error::PowError;

/// What came back from the peer
#[derive(Debug)]
pub enum Submission {
    /// Peer closed the connection before sending anything
    Disconnected,
    /// Result parsed and matched the challenge; `valid` is the digest check
    Verified { header: String, valid: bool },
    /// Read failed, or the result could not be checked
    Failed(PowError),
}

/// Submit Solution Use Case
pub struct SubmitSolutionUseCase {
    verify: VerifyFn,
}

impl SubmitSolutionUseCase {
    pub fn new(verify: VerifyFn) -> Self {
        Self { verify }
    }

    pub async fn execute<R>(&self, reader: &mut R, challenge: &str) -> Submission
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        let n = match reader.read(&mut buf).await {
            Ok(0) => return Submission::Disconnected,
            Ok(n) => n,
            Err(e) => return Submission::Failed(PowError::Transport(e)),
        };

        let header = String::from_utf8_lossy(&buf[..n]).into_owned();
        tracing::debug!(header = %header, "header to verify");

        match (self.verify)(&header, challenge) {
            Ok(valid) => Submission::Verified { header, valid },
            Err(e) => Submission::Failed(e),
        }
    }
}
