//! Engine configuration for the auction module.
//!
//! Mirrors the layout of a chain genesis file: a serde document with sane
//! defaults that is validated once before the engine starts serving calls.

use serde::{Deserialize, Serialize};

/// Default phase length limit: none. Operators opt into a cap via config.
pub const DEFAULT_MAX_PHASE_DURATION: u64 = u64::MAX;

/// Configuration for the auction engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix prepended to the asset id to form the ledger key
    pub key_prefix: String,

    /// Longest accepted bidding window (seconds); uncapped by default
    pub max_bid_duration: u64,

    /// Longest accepted reveal window (seconds); uncapped by default
    pub max_reveal_duration: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            key_prefix: String::new(),
            max_bid_duration: DEFAULT_MAX_PHASE_DURATION,
            max_reveal_duration: DEFAULT_MAX_PHASE_DURATION,
        }
    }
}

impl EngineConfig {
    /// Create a config that stores auctions under `prefix`.
    pub fn with_key_prefix(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_bid_duration == 0 {
            return Err(ConfigValidationError::InvalidDuration(
                "Maximum bid duration cannot be zero".into(),
            ));
        }
        if self.max_reveal_duration == 0 {
            return Err(ConfigValidationError::InvalidDuration(
                "Maximum reveal duration cannot be zero".into(),
            ));
        }
        if self.key_prefix.chars().any(char::is_control) {
            return Err(ConfigValidationError::InvalidKeyPrefix(self.key_prefix.clone()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid duration limit: {0}")]
    InvalidDuration(String),

    #[error("Invalid key prefix: {0:?}")]
    InvalidKeyPrefix(String),
}
