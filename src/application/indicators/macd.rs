use super::ema::{ema, ema_series};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Macd {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD from the full `EMA(fast) - EMA(slow)` line series, with the signal
/// line an EMA of that series. Values are for the latest bar.
///
/// `None` when `fast >= slow` or history is too short for the slow EMA plus
/// the signal EMA (`slow + signal - 1` values).
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> Option<Macd> {
    if fast == 0 || fast >= slow {
        return None;
    }

    let fast_series = ema_series(values, fast)?;
    let slow_series = ema_series(values, slow)?;

    // fast_series starts (slow - fast) bars earlier than slow_series
    let offset = slow - fast;
    let line: Vec<f64> = slow_series
        .iter()
        .enumerate()
        .map(|(i, slow_value)| fast_series[i + offset] - slow_value)
        .collect();

    let signal_value = ema(&line, signal)?;
    let line_value = *line.last()?;

    Some(Macd {
        line: line_value,
        signal: signal_value,
        histogram: line_value - signal_value,
    })
}
