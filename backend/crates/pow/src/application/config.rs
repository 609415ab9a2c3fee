//! Application Configuration
//!
//! Configuration for the PoW gate.

use std::ops::Range;
use std::time::Duration;

use crate::error::{PowError, PowResult};

/// Lowest difficulty ever issued; easier puzzles cost the client nothing
pub const MIN_BITS: u32 = 10;

/// Largest single read taken from the peer
pub const READ_BUFFER_SIZE: usize = 1024;

/// PoW gate configuration
#[derive(Debug, Clone)]
pub struct PowConfig {
    /// Exclusive upper bound for the issued difficulty
    pub complexity: u32,
    /// Time the client has to return a result
    pub wait_pow: Duration,
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            complexity: 30,
            wait_pow: Duration::from_secs(60),
        }
    }
}

impl PowConfig {
    pub fn new(complexity: u32, wait_pow: Duration) -> PowResult<Self> {
        let config = Self {
            complexity,
            wait_pow,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PowResult<()> {
        if self.complexity <= MIN_BITS {
            return Err(PowError::InvalidConfig(format!(
                "complexity must be greater than {MIN_BITS}, got {}",
                self.complexity
            )));
        }
        if self.wait_pow.is_zero() {
            return Err(PowError::InvalidConfig(
                "PoW wait duration must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Range the difficulty is drawn from
    pub fn bits_range(&self) -> Range<u32> {
        MIN_BITS..self.complexity
    }

    pub fn wait_pow_ms(&self) -> u64 {
        u64::try_from(self.wait_pow.as_millis()).unwrap_or(u64::MAX)
    }
}
