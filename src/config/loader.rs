//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading gateway
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::calculation::PenaltySchedule;
use crate::catalog::ErrorCatalog;
use crate::error::{GatewayError, GatewayResult};

use super::types::{ErrorCodesConfig, GatewayConfig};

/// Loads and provides access to gateway configuration.
///
/// # Directory Structure
///
/// ```text
/// config/sgk/
/// ├── gateway.yaml      # Endpoints, timeout, rate limit, batch size (required)
/// ├── error_codes.yaml  # Extra result codes for the catalog (optional)
/// └── penalties.yaml    # Indicative penalty bands (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use sgk_gateway::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/sgk").unwrap();
/// println!("Timeout: {:?}", loader.config().timeout());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: GatewayConfig,
    catalog: ErrorCatalog,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `gateway.yaml` is missing, if any present file
    /// contains invalid YAML, or if a value is out of range.
    pub fn load<P: AsRef<Path>>(path: P) -> GatewayResult<Self> {
        let path = path.as_ref();

        let mut config = Self::load_yaml::<GatewayConfig>(&path.join("gateway.yaml"))?;

        let penalties_path = path.join("penalties.yaml");
        if penalties_path.exists() {
            config.penalties = Self::load_yaml::<PenaltySchedule>(&penalties_path)?;
        }

        let codes_path = path.join("error_codes.yaml");
        let catalog = if codes_path.exists() {
            let extra = Self::load_yaml::<ErrorCodesConfig>(&codes_path)?;
            ErrorCatalog::standard_with(extra.codes)
        } else {
            ErrorCatalog::standard()
        };

        config.validate()?;
        Ok(Self { config, catalog })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> GatewayResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| GatewayError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| GatewayError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Returns the result code catalog.
    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    /// Splits the loader into configuration and catalog.
    pub fn into_parts(self) -> (GatewayConfig, ErrorCatalog) {
        (self.config, self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Environment;
    use crate::protocol::ServiceFamily;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/sgk"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.config().max_batch_size, 10);
        assert_eq!(loader.config().rate_limit.window_secs, 60);
        let url = loader
            .config()
            .endpoints
            .resolve(Environment::Production, ServiceFamily::Hire)
            .unwrap();
        assert!(url.starts_with("https://"));
    }

    #[test]
    fn test_penalties_file_overrides_schedule() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.config().penalties.low_tier_max_days, 30);
        assert_eq!(
            loader.config().penalties.high_tier_amount,
            Decimal::new(500000, 2)
        );
    }

    #[test]
    fn test_error_codes_file_extends_catalog() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert!(loader.catalog().lookup(-1).is_some());
        assert!(loader.catalog().len() > crate::catalog::ErrorCatalog::standard().len());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        match result {
            Err(GatewayError::ConfigNotFound { path }) => {
                assert!(path.contains("gateway.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
