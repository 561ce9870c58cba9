//! Signal and price request configuration parsing from environment variables.

use crate::application::signals::{DEFAULT_MIN_BARS, MIN_BARS_RANGE};
use crate::domain::market::Timeframe;
use anyhow::{Context, Result};
use std::str::FromStr;

pub const DEFAULT_CANDLE_LIMIT: usize = 200;
/// Largest page any provider serves (TwelveData `outputsize`).
pub const MAX_CANDLE_LIMIT: usize = 5000;

/// Request-level settings shared by signal and price lookups
#[derive(Debug, Clone)]
pub struct SignalEnvConfig {
    /// Most recent candles kept per request
    pub candle_limit: usize,
    /// Decision minimum bar count, clamped into 25..=60
    pub min_bars: usize,
    pub signal_default_timeframe: Timeframe,
    pub price_default_timeframe: Timeframe,
    /// Retry on coarser timeframes when a timeframe has no data
    pub coarser_fallback: bool,
}

impl Default for SignalEnvConfig {
    fn default() -> Self {
        Self {
            candle_limit: DEFAULT_CANDLE_LIMIT,
            min_bars: DEFAULT_MIN_BARS,
            signal_default_timeframe: Timeframe::OneHour,
            price_default_timeframe: Timeframe::FiveMin,
            coarser_fallback: true,
        }
    }
}

impl SignalEnvConfig {
    pub fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let candle_limit = var("CANDLE_LIMIT")
            .map(|v| v.trim().parse::<usize>())
            .transpose()
            .context("Failed to parse CANDLE_LIMIT")?
            .unwrap_or(defaults.candle_limit)
            .clamp(1, MAX_CANDLE_LIMIT);

        let min_bars = var("SIGNAL_MIN_BARS")
            .map(|v| v.trim().parse::<usize>())
            .transpose()
            .context("Failed to parse SIGNAL_MIN_BARS")?
            .unwrap_or(defaults.min_bars)
            .clamp(*MIN_BARS_RANGE.start(), *MIN_BARS_RANGE.end());

        let signal_default_timeframe = var("SIGNAL_DEFAULT_TIMEFRAME")
            .map(|v| Timeframe::from_str(v.trim()))
            .transpose()
            .context("Failed to parse SIGNAL_DEFAULT_TIMEFRAME")?
            .unwrap_or(defaults.signal_default_timeframe);

        let price_default_timeframe = var("PRICE_DEFAULT_TIMEFRAME")
            .map(|v| Timeframe::from_str(v.trim()))
            .transpose()
            .context("Failed to parse PRICE_DEFAULT_TIMEFRAME")?
            .unwrap_or(defaults.price_default_timeframe);

        let coarser_fallback = var("COARSER_TIMEFRAME_FALLBACK")
            .map(|v| v.trim().parse::<bool>())
            .transpose()
            .context("Failed to parse COARSER_TIMEFRAME_FALLBACK")?
            .unwrap_or(defaults.coarser_fallback);

        Ok(Self {
            candle_limit,
            min_bars,
            signal_default_timeframe,
            price_default_timeframe,
            coarser_fallback,
        })
    }
}
