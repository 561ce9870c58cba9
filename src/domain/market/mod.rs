// Candle data and freshness accounting
pub mod candle;

// Canonical tickers and asset classes
pub mod symbol;

pub mod timeframe;

pub use candle::{Candle, CandleSeries, Freshness, OhlcResult};
pub use symbol::{AssetClass, CanonicalSymbol};
pub use timeframe::Timeframe;
