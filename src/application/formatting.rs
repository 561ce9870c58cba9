//! Fixed text contracts handed to the messaging layer.
//!
//! Labels and line order never change with locale.

use crate::application::signals::price_decimals;
use crate::domain::market::{Candle, CanonicalSymbol, Timeframe};
use crate::domain::signal::{Decision, SignalResult};
use chrono::{DateTime, Utc};

const NOT_AVAILABLE: &str = "n/a";

/// Number with magnitude-dependent precision, or `n/a`.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", price_decimals(v), v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn format_rsi(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn format_time(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Signal block. The Entry/SL/TP line is present only for BUY and SELL.
pub fn format_signal(signal: &SignalResult, symbol: &CanonicalSymbol, timeframe: Timeframe) -> String {
    let ind = &signal.indicators;
    let mut lines = vec![
        format!("Time (UTC): {}", format_time(signal.last_candle_time)),
        format!("Symbol: {}", symbol),
        format!("Interval: {}", timeframe),
        format!("Close: {}", format_value(Some(signal.last_close))),
        format!("EMA20: {}", format_value(ind.ema20)),
        format!("EMA50: {}", format_value(ind.ema50)),
        format!("RSI14: {}", format_rsi(ind.rsi14)),
        format!(
            "MACD(12,26,9): {} / {} (hist {})",
            format_value(ind.macd_line),
            format_value(ind.macd_signal),
            format_value(ind.macd_hist)
        ),
        format!("ATR14: {}", format_value(ind.atr14)),
        format!("SIGNAL: {}", signal.decision),
    ];

    if signal.decision != Decision::Neutral
        && let Some(levels) = signal.levels
    {
        lines.push(format!(
            "Entry: {}  SL: {}  TP1: {}  TP2: {}",
            format_value(Some(levels.entry)),
            format_value(Some(levels.stop_loss)),
            format_value(Some(levels.take_profit1)),
            format_value(Some(levels.take_profit2))
        ));
    }
    lines.join("\n")
}

/// Four-line quote for a closed candle, with the slash-separated symbol.
pub fn format_price(candle: &Candle, symbol: &CanonicalSymbol) -> String {
    format!(
        "Time (UTC): {}\nSymbol: {}\nPrice: {}\nNote: latest CLOSED price",
        format_time(candle.timestamp),
        symbol.display_pair(),
        format_value(Some(candle.close))
    )
}
