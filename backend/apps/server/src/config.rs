//! Server configuration
//!
//! Read from the environment (after `.env`), falling back to defaults.

use std::env;
use std::time::Duration;

use pow::PowConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub log_level: String,
    pub tcp_addr: String,
    /// Exclusive upper bound for issued difficulty
    pub complexity: u32,
    pub wait_pow_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let pow = PowConfig::default();
        Self {
            log_level: "info".to_string(),
            tcp_addr: "0.0.0.0:8080".to_string(),
            complexity: pow.complexity,
            wait_pow_ms: pow.wait_pow_ms(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("LOG_LEVEL") {
            config.log_level = val;
        }

        if let Some(val) = lookup("TCP_ADDR") {
            config.tcp_addr = val;
        }

        if let Some(val) = lookup("COMPLEXITY") {
            config.complexity = val
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("COMPLEXITY".to_string(), val))?;
        }

        if let Some(val) = lookup("WAIT_POW_MS") {
            config.wait_pow_ms = val
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("WAIT_POW_MS".to_string(), val))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tcp_addr.is_empty() {
            return Err(ConfigError::ValidationError(
                "TCP_ADDR cannot be empty".to_string(),
            ));
        }

        self.pow_config()
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    pub fn pow_config(&self) -> PowConfig {
        PowConfig {
            complexity: self.complexity,
            wait_pow: Duration::from_millis(self.wait_pow_ms),
        }
    }

    /// Default tracing directive when `RUST_LOG` is unset
    pub fn log_filter(&self) -> String {
        let level = &self.log_level;
        format!("wisdom_server={level},pow={level},platform={level},wisdom={level}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.tcp_addr, "0.0.0.0:8080");
        assert_eq!(config.complexity, 30);
        assert_eq!(config.pow_config().wait_pow, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("LOG_LEVEL", "debug"),
            ("TCP_ADDR", "127.0.0.1:9000"),
            ("COMPLEXITY", "22"),
            ("WAIT_POW_MS", "1500"),
        ]))
        .unwrap();

        assert_eq!(config.tcp_addr, "127.0.0.1:9000");
        assert_eq!(config.complexity, 22);
        assert_eq!(config.pow_config().wait_pow, Duration::from_millis(1500));
        assert_eq!(
            config.log_filter(),
            "wisdom_server=debug,pow=debug,platform=debug,wisdom=debug"
        );
    }

    #[test]
    fn test_unparsable_value() {
        let err = ServerConfig::from_lookup(lookup(&[("COMPLEXITY", "hard")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "COMPLEXITY"));
    }

    #[test]
    fn test_complexity_too_low() {
        let err = ServerConfig::from_lookup(lookup(&[("COMPLEXITY", "10")])).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_zero_wait() {
        let err = ServerConfig::from_lookup(lookup(&[("WAIT_POW_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
