//! Candle provider configuration parsing from environment variables.
//!
//! - Binance (crypto, public endpoint, no key)
//! - TwelveData (forex/metals, primary)
//! - Polygon (forex/metals, secondary)

use std::fmt;

pub const DEFAULT_TIMEOUT_SECS: u64 = 8;
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 30;

/// Shows the first four characters of a credential and masks the rest.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "<unset>".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}

/// Binance public market data configuration
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    pub base_url: String,
}

impl BinanceConfig {
    pub fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: var("BINANCE_BASE_URL")
                .unwrap_or_else(|| "https://api.binance.com".to_string()),
        }
    }
}

/// TwelveData API configuration
#[derive(Clone)]
pub struct TwelveDataConfig {
    pub api_key: String,
    pub base_url: String,
}

impl TwelveDataConfig {
    pub fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: var("TWELVEDATA_API_KEY").unwrap_or_default(),
            base_url: var("TWELVEDATA_BASE_URL")
                .unwrap_or_else(|| "https://api.twelvedata.com".to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl fmt::Debug for TwelveDataConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwelveDataConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Polygon API configuration
#[derive(Clone)]
pub struct PolygonConfig {
    pub api_key: String,
    pub base_url: String,
}

impl PolygonConfig {
    pub fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: var("POLYGON_API_KEY").unwrap_or_default(),
            base_url: var("POLYGON_BASE_URL")
                .unwrap_or_else(|| "https://api.polygon.io".to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl fmt::Debug for PolygonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolygonConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Aggregated provider configuration
#[derive(Debug, Clone)]
pub struct ProviderEnvConfig {
    pub binance: BinanceConfig,
    pub twelvedata: TwelveDataConfig,
    pub polygon: PolygonConfig,
    /// Per-call timeout, clamped to 1..=30 seconds
    pub timeout_secs: u64,
}

impl ProviderEnvConfig {
    pub fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Self {
        let timeout_secs = var("PROVIDER_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);

        Self {
            binance: BinanceConfig::from_vars(var),
            twelvedata: TwelveDataConfig::from_vars(var),
            polygon: PolygonConfig::from_vars(var),
            timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ProviderEnvConfig::from_vars(&vars(&[]));
        assert_eq!(config.binance.base_url, "https://api.binance.com");
        assert_eq!(config.twelvedata.base_url, "https://api.twelvedata.com");
        assert_eq!(config.polygon.base_url, "https://api.polygon.io");
        assert_eq!(config.timeout_secs, 8);
        assert!(!config.twelvedata.is_configured());
        assert!(!config.polygon.is_configured());
    }

    #[test]
    fn test_timeout_is_clamped() {
        let config = ProviderEnvConfig::from_vars(&vars(&[("PROVIDER_TIMEOUT_SECS", "120")]));
        assert_eq!(config.timeout_secs, 30);
        let config = ProviderEnvConfig::from_vars(&vars(&[("PROVIDER_TIMEOUT_SECS", "0")]));
        assert_eq!(config.timeout_secs, 1);
        let config = ProviderEnvConfig::from_vars(&vars(&[("PROVIDER_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout_secs, 8);
    }

    #[test]
    fn test_debug_masks_keys() {
        let config = ProviderEnvConfig::from_vars(&vars(&[
            ("TWELVEDATA_API_KEY", "td_secret_123456"),
            ("POLYGON_API_KEY", "pg_secret_abcdef"),
        ]));
        let debug = format!("{:?}", config);
        assert!(debug.contains("td_s****"));
        assert!(debug.contains("pg_s****"));
        assert!(!debug.contains("secret_123456"));
        assert!(!debug.contains("secret_abcdef"));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "<unset>");
        assert_eq!(mask_secret("ab"), "ab****");
    }
}
