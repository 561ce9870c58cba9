//! Polygon aggregates (`/v2/aggs`) as a candle provider.

use crate::domain::errors::ProviderError;
use crate::domain::market::{AssetClass, CanonicalSymbol, Timeframe};
use crate::domain::ports::{CandleProvider, PolygonAgg, ProviderRows};
use crate::infrastructure::core::http_client_factory::{build_url_with_query, get_json};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub const POLYGON_PROVIDER: &str = "polygon";

/// Extra look-back so weekends and holidays still leave `limit` bars.
const LOOKBACK_FACTOR: i64 = 3;
const MIN_LOOKBACK_DAYS: i64 = 4;
/// Polygon's own cap on aggregates per request.
const MAX_AGGREGATES: usize = 50_000;

#[derive(Debug, Deserialize)]
struct AggregatesResponse {
    status: Option<String>,
    error: Option<String>,
    message: Option<String>,
    #[serde(default)]
    results: Vec<PolygonAgg>,
}

pub struct PolygonCandleProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PolygonCandleProvider {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }
}

/// `C:XAUUSD` for forex and metals, `X:BTCUSD` for crypto.
pub fn polygon_ticker(symbol: &CanonicalSymbol) -> String {
    match symbol.asset_class() {
        AssetClass::Crypto => {
            let bare = symbol.as_str();
            let usd = bare.strip_suffix("USDT").map(|base| format!("{}USD", base));
            format!("X:{}", usd.as_deref().unwrap_or(bare))
        }
        AssetClass::ForexMetal => format!("C:{}", symbol.as_str()),
    }
}

/// `(from_ms, to_ms)` covering at least `limit` bars ending at `now`.
pub fn query_window(timeframe: Timeframe, limit: usize, now: DateTime<Utc>) -> (i64, i64) {
    let bars = limit.min(MAX_AGGREGATES) as i64;
    let span_secs = (timeframe.to_seconds() * bars * LOOKBACK_FACTOR).max(MIN_LOOKBACK_DAYS * 86_400);
    let from = now - ChronoDuration::seconds(span_secs);
    (from.timestamp_millis(), now.timestamp_millis())
}

/// Rows from an aggregates body. `ERROR` and `NOT_AUTHORIZED` statuses are
/// failures; a missing `results` array is an empty answer.
pub fn parse_aggregates(body: Value) -> Result<ProviderRows, ProviderError> {
    let response: AggregatesResponse =
        serde_json::from_value(body).map_err(|e| ProviderError::Decode {
            provider: POLYGON_PROVIDER.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(status) = response.status.as_deref()
        && matches!(status, "ERROR" | "NOT_AUTHORIZED")
    {
        return Err(ProviderError::Rejected {
            provider: POLYGON_PROVIDER.to_string(),
            reason: response
                .error
                .or(response.message)
                .unwrap_or_else(|| status.to_string()),
        });
    }
    Ok(ProviderRows::Polygon(response.results))
}

#[async_trait]
impl CandleProvider for PolygonCandleProvider {
    fn name(&self) -> &str {
        POLYGON_PROVIDER
    }

    async fn fetch_rows(
        &self,
        symbol: &CanonicalSymbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<ProviderRows, ProviderError> {
        let ticker = polygon_ticker(symbol);
        let (multiplier, unit) = timeframe.to_polygon_range();
        let (from_ms, to_ms) = query_window(timeframe, limit, Utc::now());

        let path = format!(
            "/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
            ticker, multiplier, unit, from_ms, to_ms
        );
        let url = build_url_with_query(
            &self.base_url,
            &path,
            &[
                ("adjusted", "true"),
                ("sort", "asc"),
                ("limit", "50000"),
                ("apiKey", self.api_key.as_str()),
            ],
        )
        .map_err(|e| ProviderError::Transport {
            provider: POLYGON_PROVIDER.to_string(),
            reason: format!("invalid base URL: {}", e),
        })?;

        debug!(
            "PolygonCandleProvider: aggs {} {}x{} limit={}",
            ticker, multiplier, unit, limit
        );
        let body = get_json(&self.client, POLYGON_PROVIDER, url).await?;
        parse_aggregates(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sym(s: &str) -> CanonicalSymbol {
        CanonicalSymbol::parse(s).unwrap()
    }

    #[test]
    fn test_ticker_prefixes() {
        assert_eq!(polygon_ticker(&sym("XAUUSD")), "C:XAUUSD");
        assert_eq!(polygon_ticker(&sym("EURUSD")), "C:EURUSD");
        assert_eq!(polygon_ticker(&sym("BTCUSDT")), "X:BTCUSD");
        assert_eq!(polygon_ticker(&sym("ETHUSD")), "X:ETHUSD");
    }

    #[test]
    fn test_query_window_has_minimum_span() {
        let now = Utc.timestamp_opt(1_704_067_200, 0).unwrap();
        let (from, to) = query_window(Timeframe::OneMin, 10, now);
        assert_eq!(to, 1_704_067_200_000);
        assert_eq!(to - from, 4 * 86_400 * 1000);

        let (from, _) = query_window(Timeframe::OneDay, 200, now);
        assert_eq!(to - from, 600 * 86_400 * 1000);
    }

    #[test]
    fn test_query_window_caps_huge_limits() {
        let now = Utc.timestamp_opt(1_704_067_200, 0).unwrap();
        let (from, to) = query_window(Timeframe::OneDay, usize::MAX, now);
        assert_eq!(to - from, 50_000 * 3 * 86_400 * 1000);
    }

    #[test]
    fn test_parse_results() {
        let body = json!({
            "ticker": "C:XAUUSD",
            "status": "OK",
            "resultsCount": 1,
            "results": [{"v": 120, "o": 2062.0, "c": 2063.1, "h": 2063.5, "l": 2060.9, "t": 1_704_067_200_000i64, "n": 120}]
        });
        assert_eq!(parse_aggregates(body).unwrap().len(), 1);
    }

    #[test]
    fn test_delayed_status_is_data() {
        let body = json!({"status": "DELAYED", "results": []});
        assert!(parse_aggregates(body).unwrap().is_empty());
    }

    #[test]
    fn test_not_authorized_is_failure() {
        let body = json!({"status": "NOT_AUTHORIZED", "message": "Your plan doesn't include this data timeframe."});
        let err = parse_aggregates(body).unwrap_err();
        assert!(matches!(err, ProviderError::Rejected { .. }));
        assert!(err.to_string().contains("plan"));
    }
}
