//! Binance klines as a candle provider.
//!
//! Public market data only: no API key is needed for `/api/v3/klines`.

use super::common::{MAX_KLINES_LIMIT, binance_symbol};
use crate::domain::errors::ProviderError;
use crate::domain::market::{CanonicalSymbol, Timeframe};
use crate::domain::ports::{CandleProvider, ProviderRows};
use crate::infrastructure::core::http_client_factory::{
    HttpClientFactory, build_url_with_query, get_json,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const BINANCE_PROVIDER: &str = "binance";
const DEFAULT_BASE_URL: &str = "https://api.binance.com";

pub struct BinanceCandleProvider {
    client: Client,
    base_url: String,
}

impl BinanceCandleProvider {
    pub fn builder() -> BinanceCandleProviderBuilder {
        BinanceCandleProviderBuilder::default()
    }
}

#[derive(Default)]
pub struct BinanceCandleProviderBuilder {
    base_url: Option<String>,
    client: Option<Client>,
}

impl BinanceCandleProviderBuilder {
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> BinanceCandleProvider {
        BinanceCandleProvider {
            client: self
                .client
                .unwrap_or_else(|| HttpClientFactory::create_client(Duration::from_secs(8))),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Klines payload is a bare array of arrays:
/// `[openTimeMs, "open", "high", "low", "close", "volume", ...]`.
/// Binance error payloads are objects with `code` and `msg`.
pub fn parse_klines(body: Value) -> Result<ProviderRows, ProviderError> {
    match body {
        Value::Array(rows) => Ok(ProviderRows::Binance(
            rows.into_iter()
                .filter_map(|row| match row {
                    Value::Array(fields) => Some(fields),
                    _ => None,
                })
                .collect(),
        )),
        Value::Object(map) => Err(ProviderError::Rejected {
            provider: BINANCE_PROVIDER.to_string(),
            reason: map
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or("unexpected object response")
                .to_string(),
        }),
        other => Err(ProviderError::Decode {
            provider: BINANCE_PROVIDER.to_string(),
            reason: format!("expected an array of klines, got {}", type_name(&other)),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl CandleProvider for BinanceCandleProvider {
    fn name(&self) -> &str {
        BINANCE_PROVIDER
    }

    async fn fetch_rows(
        &self,
        symbol: &CanonicalSymbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<ProviderRows, ProviderError> {
        let api_symbol = binance_symbol(symbol);
        let limit = limit.clamp(1, MAX_KLINES_LIMIT).to_string();

        let url = build_url_with_query(
            &self.base_url,
            "/api/v3/klines",
            &[
                ("symbol", api_symbol.as_str()),
                ("interval", timeframe.to_binance_string()),
                ("limit", limit.as_str()),
            ],
        )
        .map_err(|e| ProviderError::Transport {
            provider: BINANCE_PROVIDER.to_string(),
            reason: format!("invalid base URL: {}", e),
        })?;

        debug!(
            "BinanceCandleProvider: klines {} {} limit={}",
            api_symbol, timeframe, limit
        );
        let body = get_json(&self.client, BINANCE_PROVIDER, url).await?;
        parse_klines(body)
    }
}
