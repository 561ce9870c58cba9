//! Candle retrieval: provider fall-through, row mapping and freshness.

pub mod gateway;
pub mod rows;

pub use gateway::{MIN_PREFERRED_CANDLES, OhlcGateway, ProviderRoutes};
