use crate::domain::signal::{Decision, TradeLevels};

/// Minimum risk as a fraction of the last close when ATR is unusable.
pub const FALLBACK_RISK_FRACTION: f64 = 0.0015;

/// Display precision for a price: 2 decimals above 100, 4 from 1 to 100,
/// 6 below 1.
pub fn price_decimals(value: f64) -> usize {
    let magnitude = value.abs();
    if magnitude > 100.0 {
        2
    } else if magnitude >= 1.0 {
        4
    } else {
        6
    }
}

pub fn round_price(value: f64) -> f64 {
    let factor = 10f64.powi(price_decimals(value) as i32);
    (value * factor).round() / factor
}

/// Distance from entry to stop. ATR when finite and positive, otherwise the
/// larger of a fixed fraction of the close and the last bar-to-bar move.
pub fn risk_distance(atr: Option<f64>, last_close: f64, previous_close: Option<f64>) -> f64 {
    if let Some(atr) = atr
        && atr.is_finite()
        && atr > 0.0
    {
        return atr;
    }

    let floor = FALLBACK_RISK_FRACTION * last_close.abs();
    let last_move = previous_close.map_or(0.0, |prev| (last_close - prev).abs());
    floor.max(last_move)
}

/// Entry, stop and targets at 1R and 2R. `None` for a neutral decision.
pub fn trade_levels(decision: Decision, entry: f64, risk: f64) -> Option<TradeLevels> {
    let direction = match decision {
        Decision::Buy => 1.0,
        Decision::Sell => -1.0,
        Decision::Neutral => return None,
    };

    Some(TradeLevels {
        entry: round_price(entry),
        stop_loss: round_price(entry - direction * risk),
        take_profit1: round_price(entry + direction * risk),
        take_profit2: round_price(entry + direction * 2.0 * risk),
    })
}
