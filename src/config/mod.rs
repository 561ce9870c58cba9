//! Configuration module for Rustsignal.
//!
//! Configuration is loaded from environment variables, organized by concern:
//! candle providers and signal/price requests.

mod provider_config;
mod signal_config;

pub use provider_config::{
    BinanceConfig, DEFAULT_TIMEOUT_SECS, PolygonConfig, ProviderEnvConfig, TwelveDataConfig,
    mask_secret,
};
pub use signal_config::{DEFAULT_CANDLE_LIMIT, SignalEnvConfig};

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub providers: ProviderEnvConfig,
    pub signal: SignalEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let providers = ProviderEnvConfig::from_vars(&var);
        let signal = SignalEnvConfig::from_vars(&var).context("Failed to load signal config")?;

        Ok(Self { providers, signal })
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.providers.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_empty_lookup_uses_defaults() {
        let config = Config::from_vars(|_| None).unwrap();
        assert_eq!(config.provider_timeout(), Duration::from_secs(8));
        assert_eq!(config.signal.candle_limit, 200);
    }

    #[test]
    fn test_config_error_names_the_section() {
        let err = Config::from_vars(|key| (key == "SIGNAL_MIN_BARS").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load signal config"));
    }
}
