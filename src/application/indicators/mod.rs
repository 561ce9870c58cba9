//! Stateless indicator functions over chronologically ordered prices.
//!
//! Every function returns `None` when history is too short; callers treat
//! that as "unknown", never as zero.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use atr::atr;
pub use ema::{ema, ema_series};
pub use macd::{Macd, macd};
pub use rsi::rsi;

use crate::domain::market::CandleSeries;
use crate::domain::signal::IndicatorSet;

pub const EMA_FAST_PERIOD: usize = 20;
pub const EMA_SLOW_PERIOD: usize = 50;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;
pub const ATR_PERIOD: usize = 14;

/// Computes the full indicator set for the latest bar of `series`.
pub fn compute_indicators(series: &CandleSeries) -> IndicatorSet {
    let closes = series.closes();
    let macd = macd(&closes, MACD_FAST_PERIOD, MACD_SLOW_PERIOD, MACD_SIGNAL_PERIOD);

    IndicatorSet {
        ema20: ema(&closes, EMA_FAST_PERIOD),
        ema50: ema(&closes, EMA_SLOW_PERIOD),
        rsi14: rsi(&closes, RSI_PERIOD),
        macd_line: macd.map(|m| m.line),
        macd_signal: macd.map(|m| m.signal),
        macd_hist: macd.map(|m| m.histogram),
        atr14: atr(&series.highs(), &series.lows(), &closes, ATR_PERIOD),
    }
}
