//! Client configuration

use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub log_level: String,
    pub server_addr: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("LOG_LEVEL") {
            config.log_level = val;
        }

        if let Some(val) = lookup("SERVER_ADDR") {
            config.server_addr = val;
        }

        if config.server_addr.is_empty() {
            return Err(ConfigError::ValidationError(
                "SERVER_ADDR cannot be empty".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn log_filter(&self) -> String {
        let level = &self.log_level;
        format!("wisdom_client={level},pow={level}")
    }
}
