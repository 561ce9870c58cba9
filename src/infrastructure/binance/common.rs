//! Symbol and interval vocabulary for Binance

use crate::domain::market::CanonicalSymbol;

/// Binance lists USD-quoted crypto against USDT.
pub fn binance_symbol(symbol: &CanonicalSymbol) -> String {
    match symbol.split() {
        Some((base, "USD")) => format!("{}USDT", base),
        _ => symbol.as_str().to_string(),
    }
}

/// Maximum rows Binance returns per klines request.
pub const MAX_KLINES_LIMIT: usize = 1000;
