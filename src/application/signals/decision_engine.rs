use super::levels::{risk_distance, trade_levels};
use crate::application::indicators::compute_indicators;
use crate::domain::market::{CandleSeries, Timeframe};
use crate::domain::signal::{Decision, IndicatorSet, NeutralReason, SignalResult};
use std::ops::RangeInclusive;
use tracing::debug;

pub const BUY_RSI_MIN: f64 = 55.0;
pub const SELL_RSI_MAX: f64 = 45.0;

/// A MACD histogram against the trend within this fraction of the MACD
/// magnitude still confirms it.
pub const MACD_TOLERANCE: f64 = 0.01;

pub const DEFAULT_MIN_BARS: usize = 50;
/// Allowed values for the minimum bar count.
pub const MIN_BARS_RANGE: RangeInclusive<usize> = 25..=60;

/// EMA/RSI/MACD gate with ATR-based levels.
///
/// One minimum bar count applies to every decision made by an engine.
#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine {
    min_bars: usize,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_BARS)
    }
}

impl DecisionEngine {
    /// `min_bars` is clamped into [`MIN_BARS_RANGE`].
    pub fn new(min_bars: usize) -> Self {
        Self {
            min_bars: min_bars.clamp(*MIN_BARS_RANGE.start(), *MIN_BARS_RANGE.end()),
        }
    }

    pub fn min_bars(&self) -> usize {
        self.min_bars
    }

    /// Decides on the latest bar of `series`. `stale` is passed through
    /// unchanged; a stale series is still evaluated.
    pub fn decide(&self, series: &CandleSeries, timeframe: Timeframe, stale: bool) -> SignalResult {
        let indicators = compute_indicators(series);
        let last = series.last();

        let (decision, neutral_reason) = if series.len() < self.min_bars {
            (
                Decision::Neutral,
                Some(NeutralReason::InsufficientHistory {
                    bars: series.len(),
                    required: self.min_bars,
                }),
            )
        } else {
            match evaluate(&indicators) {
                Ok(Decision::Neutral) => (Decision::Neutral, Some(NeutralReason::NoConfluence)),
                Ok(decision) => (decision, None),
                Err(reason) => (Decision::Neutral, Some(reason)),
            }
        };

        let risk = risk_distance(
            indicators.atr14,
            last.close,
            series.previous().map(|c| c.close),
        );
        let levels = trade_levels(decision, last.close, risk);

        debug!(
            "DecisionEngine: {} bars on {} -> {} ({:?})",
            series.len(),
            timeframe,
            decision,
            neutral_reason
        );

        SignalResult {
            decision,
            levels,
            indicators,
            neutral_reason,
            last_close: last.close,
            last_candle_time: last.timestamp,
            stale,
        }
    }
}

fn evaluate(indicators: &IndicatorSet) -> Result<Decision, NeutralReason> {
    let (Some(fast), Some(slow), Some(rsi), Some(line), Some(signal)) = (
        indicators.ema20,
        indicators.ema50,
        indicators.rsi14,
        indicators.macd_line,
        indicators.macd_signal,
    ) else {
        return Err(NeutralReason::MissingIndicator);
    };

    let slack = MACD_TOLERANCE * line.abs().max(signal.abs());

    let decision = if fast > slow && rsi >= BUY_RSI_MIN && line - signal >= -slack {
        Decision::Buy
    } else if fast < slow && rsi <= SELL_RSI_MAX && line - signal <= slack {
        Decision::Sell
    } else {
        Decision::Neutral
    };
    Ok(decision)
}
