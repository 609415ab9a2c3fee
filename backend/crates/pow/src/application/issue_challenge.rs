//! Issue Challenge Use Case

use std::sync::Arc;

use kernel::id::ResourceId;
use rand::Rng;

use crate::application::config::PowConfig;
use crate::domain::services::ChallengeFn;
use crate::error::PowResult;

/// Output DTO for issue challenge
#[derive(Debug, Clone)]
pub struct IssueChallengeOutput {
    /// Serialized header written to the peer
    pub header: String,
    pub bits: u32,
    pub resource: String,
}

/// Issue Challenge Use Case
pub struct IssueChallengeUseCase {
    config: Arc<PowConfig>,
    challenge: ChallengeFn,
}

impl IssueChallengeUseCase {
    pub fn new(config: Arc<PowConfig>, challenge: ChallengeFn) -> Self {
        Self { config, challenge }
    }

    pub fn execute(&self) -> PowResult<IssueChallengeOutput> {
        self.config.validate()?;

        let bits = rand::rng().random_range(self.config.bits_range());
        // nothing real to bind to, so every challenge gets a fresh token
        let resource = ResourceId::new().to_string();
        let header = (self.challenge)(bits, &resource)?;

        tracing::info!(bits, resource = %resource, "Issued challenge");

        Ok(IssueChallengeOutput {
            header,
            bits,
            resource,
        })
    }
}
