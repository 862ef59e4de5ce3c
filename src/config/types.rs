//! Configuration types for the gateway.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every field has a
//! built-in default so a gateway can be built without any file.

use std::time::Duration;

use serde::Deserialize;

use crate::calculation::PenaltySchedule;
use crate::catalog::ErrorEntry;
use crate::error::{GatewayError, GatewayResult};
use crate::transport::Endpoints;
use crate::validation::PROTOCOL_MAX_BATCH_SIZE;

/// Sliding-window request ceiling per gateway instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RateLimitConfig {
    /// Calls allowed within one window.
    #[serde(default = "default_max_calls")]
    pub max_calls: usize,
    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_max_calls() -> usize {
    30
}

fn default_window_secs() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_calls: default_max_calls(),
            window_secs: default_window_secs(),
        }
    }
}

impl RateLimitConfig {
    /// The window as a duration.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Gateway configuration, read from `gateway.yaml`.
///
/// Credentials are not part of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    /// Test and production endpoint sets.
    #[serde(default)]
    pub endpoints: Endpoints,
    /// Default per-call timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Request-rate ceiling.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Records accepted per submission, at most the protocol limit.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Indicative penalty bands.
    #[serde(default)]
    pub penalties: PenaltySchedule,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_batch_size() -> usize {
    PROTOCOL_MAX_BATCH_SIZE
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timeout_ms: default_timeout_ms(),
            rate_limit: RateLimitConfig::default(),
            max_batch_size: default_max_batch_size(),
            penalties: PenaltySchedule::default(),
        }
    }
}

impl GatewayConfig {
    /// The per-call timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> GatewayResult<()> {
        if self.max_batch_size == 0 || self.max_batch_size > PROTOCOL_MAX_BATCH_SIZE {
            return Err(GatewayError::configuration(format!(
                "max_batch_size must be between 1 and {}, got {}",
                PROTOCOL_MAX_BATCH_SIZE, self.max_batch_size
            )));
        }
        if self.timeout_ms == 0 {
            return Err(GatewayError::configuration("timeout_ms must be positive"));
        }
        if self.rate_limit.max_calls == 0 || self.rate_limit.window_secs == 0 {
            return Err(GatewayError::configuration(
                "rate_limit needs a positive max_calls and window_secs",
            ));
        }
        Ok(())
    }
}

/// Extra catalog entries file structure (`error_codes.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorCodesConfig {
    /// Entries added to, or replacing, the built-in catalog.
    pub codes: Vec<ErrorEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_batch_size, 10);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: GatewayConfig = serde_yaml::from_str("timeout_ms: 5000").unwrap();
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert_eq!(config.endpoints, Endpoints::default());
    }

    #[test]
    fn test_batch_size_above_protocol_limit_is_rejected() {
        let config = GatewayConfig {
            max_batch_size: 11,
            ..GatewayConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GatewayError::Configuration { .. })
        ));
    }
}
