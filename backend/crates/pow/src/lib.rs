//! PoW (Proof of Work) Gate
//!
//! Clean Architecture structure:
//! - `domain/` - Hashcash header codec and engine
//! - `application/` - Use cases (issue a challenge, check a result)
//! - `presentation/` - Connection middleware
//!
//! ## Security Model
//! - The server alone picks the difficulty and mints the challenge
//! - A result is accepted only for the exact challenge issued on the same connection
//! - Challenges are single use and never stored
//! - Every session is bounded by the configured wait duration

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{MIN_BITS, PowConfig};
pub use domain::header::Header;
pub use domain::services::{calculate, challenge, verify};
pub use error::{HeaderError, PowError, PowResult};
pub use presentation::middleware::{ProofOfWork, SessionOutcome};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult, OptionExt},
    kind::ErrorKind,
};
