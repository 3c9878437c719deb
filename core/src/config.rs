//! Client configuration.
//!
//! Everything here is fixed for the client's lifetime: base URL, API key,
//! the execution mode declared on mutating calls, the chain tag sent on
//! profile creation, and an optional per-request timeout.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::types::Execution;

pub const ENV_BASE_URL: &str = "TAPESTRY_API_BASE_URL";
pub const ENV_API_KEY: &str = "TAPESTRY_API_KEY";
pub const ENV_EXECUTION: &str = "TAPESTRY_EXECUTION";
pub const ENV_BLOCKCHAIN: &str = "TAPESTRY_BLOCKCHAIN";
pub const ENV_TIMEOUT_SECS: &str = "TAPESTRY_TIMEOUT_SECS";

pub const DEFAULT_BLOCKCHAIN: &str = "SOLANA";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub execution: Execution,
    pub blockchain: String,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            execution: Execution::default(),
            blockchain: DEFAULT_BLOCKCHAIN.to_string(),
            timeout: None,
        }
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_blockchain(mut self, blockchain: impl Into<String>) -> Self {
        self.blockchain = blockchain.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load configuration from the environment, reading `.env` first if one
    /// exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let mut config = Self::new(&required(ENV_BASE_URL)?, &required(ENV_API_KEY)?);

        if let Some(raw) = lookup(ENV_EXECUTION) {
            config.execution = raw.parse().map_err(|reason| ConfigError::Invalid {
                name: ENV_EXECUTION,
                reason,
            })?;
        }
        if let Some(blockchain) = lookup(ENV_BLOCKCHAIN).filter(|v| !v.is_empty()) {
            config.blockchain = blockchain;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                name: ENV_TIMEOUT_SECS,
                reason: e.to_string(),
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
