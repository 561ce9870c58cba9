pub mod binance;
pub mod core;
pub mod factory;
pub mod mock;
pub mod observability;
pub mod polygon;
pub mod twelvedata;

pub use binance::BinanceCandleProvider;
pub use polygon::PolygonCandleProvider;
pub use twelvedata::TwelveDataCandleProvider;
