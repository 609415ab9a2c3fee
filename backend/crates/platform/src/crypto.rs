//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Error from the operating system randomness source
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("read random bytes: {0}")]
    RandomSource(String),
}

/// Generate cryptographically secure random bytes
///
/// Fails only when the OS randomness source is unavailable.
pub fn random_bytes(len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::RandomSource(e.to_string()))?;
    Ok(bytes)
}

/// Compute SHA-256 hash
///
/// Every call builds its own hasher state, so concurrent callers never share one.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode bytes as base64 (standard alphabet, padded)
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}
