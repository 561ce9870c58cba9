use crate::domain::errors::ProviderError;
use crate::domain::market::{CanonicalSymbol, Timeframe};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Row from TwelveData `/time_series` (`values[]`). Fields arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct TwelveDataRow {
    pub datetime: Option<Value>,
    pub open: Option<Value>,
    pub high: Option<Value>,
    pub low: Option<Value>,
    pub close: Option<Value>,
}

/// Aggregate bar from Polygon `/v2/aggs`. `t` is epoch milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct PolygonAgg {
    pub t: Option<Value>,
    pub o: Option<Value>,
    pub h: Option<Value>,
    pub l: Option<Value>,
    pub c: Option<Value>,
}

/// Provider-native rows. Never leaves the gateway; mapped into `Candle`
/// by `application::market_data::rows`.
#[derive(Debug, Clone)]
pub enum ProviderRows {
    /// Binance kline arrays: `[openTimeMs, "open", "high", "low", "close", ...]`
    Binance(Vec<Vec<Value>>),
    TwelveData(Vec<TwelveDataRow>),
    Polygon(Vec<PolygonAgg>),
}

impl ProviderRows {
    pub fn len(&self) -> usize {
        match self {
            ProviderRows::Binance(rows) => rows.len(),
            ProviderRows::TwelveData(rows) => rows.len(),
            ProviderRows::Polygon(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An external OHLC data source.
#[async_trait]
pub trait CandleProvider: Send + Sync {
    /// Short stable identifier used in logs, metrics and `OhlcResult::provider_used`.
    fn name(&self) -> &str;

    /// Fetches raw rows for `symbol` on `timeframe`, asking for at least `limit` bars.
    async fn fetch_rows(
        &self,
        symbol: &CanonicalSymbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<ProviderRows, ProviderError>;
}
