//! PoW Error Types
//!
//! This module provides PoW-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use std::num::ParseIntError;

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::crypto::CryptoError;
use thiserror::Error;

/// PoW-specific result type alias
pub type PowResult<T> = Result<T, PowError>;

/// Why a header string could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("malformed header string [{0}]")]
    MalformedHeader(String),

    #[error("convert version to int: {0}")]
    InvalidVersion(ParseIntError),

    #[error("unsupported version {0}")]
    UnsupportedVersion(i64),

    #[error("convert bits to int: {0}")]
    InvalidBits(ParseIntError),

    #[error("parse date [{0}]")]
    InvalidDate(String),

    #[error("decode counter: {0}")]
    InvalidCounterEncoding(base64::DecodeError),

    #[error("convert counter to int: {0}")]
    InvalidCounter(String),
}

/// PoW-specific error variants
///
/// These can be converted to `AppError` for unified error handling.
#[derive(Debug, Error)]
pub enum PowError {
    /// Header handed to the solver could not be parsed
    #[error("parse header string: {0}")]
    Header(#[from] HeaderError),

    /// Peer's result could not be parsed
    #[error("parse calculated header string: {0}")]
    CalculatedHeader(HeaderError),

    /// Stored challenge could not be parsed
    #[error("parse challenge header string: {0}")]
    ChallengeHeader(HeaderError),

    /// Result does not belong to the challenge that was issued
    #[error("calculated header doesn't match the challenge")]
    ChallengeMismatch,

    /// No digest can carry this many leading zero bits
    #[error("bits {0} exceed the digest size")]
    UnsatisfiableBits(u32),

    #[error("create new header: {0}")]
    RandomSource(#[from] CryptoError),

    #[error("connection I/O: {0}")]
    Transport(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PowError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PowError::Header(_)
            | PowError::CalculatedHeader(_)
            | PowError::ChallengeHeader(_)
            | PowError::UnsatisfiableBits(_) => ErrorKind::Protocol,
            PowError::ChallengeMismatch => ErrorKind::ChallengeMismatch,
            PowError::Transport(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
                ) =>
            {
                ErrorKind::Timeout
            }
            PowError::Transport(_) => ErrorKind::Transport,
            PowError::RandomSource(_) | PowError::InvalidConfig(_) => ErrorKind::Internal,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            PowError::RandomSource(e) => {
                tracing::error!(error = %e, "PoW random source error");
            }
            PowError::InvalidConfig(msg) => {
                tracing::error!(message = %msg, "PoW configuration error");
            }
            PowError::ChallengeMismatch => {
                tracing::warn!("PoW result for a different challenge");
            }
            PowError::Transport(e) => {
                tracing::warn!(error = %e, "PoW connection error");
            }
            _ => {
                tracing::debug!(error = %self, "PoW error");
            }
        }
    }
}

impl From<PowError> for AppError {
    fn from(err: PowError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_errors_are_protocol_faults() {
        let err = PowError::CalculatedHeader(HeaderError::UnsupportedVersion(2));
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(
            err.to_string(),
            "parse calculated header string: unsupported version 2"
        );
    }

    #[test]
    fn test_mismatch_message() {
        let err = PowError::ChallengeMismatch;
        assert_eq!(err.kind(), ErrorKind::ChallengeMismatch);
        assert_eq!(
            err.to_string(),
            "calculated header doesn't match the challenge"
        );
    }

    #[test]
    fn test_transport_timeout_is_classified() {
        let err = PowError::from(std::io::Error::from(std::io::ErrorKind::TimedOut));
        assert_eq!(err.kind(), ErrorKind::Timeout);

        let err = PowError::from(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_into_app_error_keeps_kind_and_source() {
        use std::error::Error;

        let app: AppError = PowError::RandomSource(CryptoError::RandomSource("empty".into())).into();
        assert_eq!(app.kind(), ErrorKind::Internal);
        assert!(app.is_server_error());
        assert!(app.source().is_some());
    }
}
