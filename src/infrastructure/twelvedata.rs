//! TwelveData `/time_series` as a candle provider for forex and metals.

use crate::domain::errors::ProviderError;
use crate::domain::market::{CanonicalSymbol, Timeframe};
use crate::domain::ports::{CandleProvider, ProviderRows, TwelveDataRow};
use crate::infrastructure::core::http_client_factory::{build_url_with_query, get_json};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub const TWELVEDATA_PROVIDER: &str = "twelvedata";

/// Largest `outputsize` accepted by the API.
const MAX_OUTPUT_SIZE: usize = 5000;

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    values: Vec<TwelveDataRow>,
}

pub struct TwelveDataCandleProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TwelveDataCandleProvider {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }
}

/// Rows from a `/time_series` body. TwelveData reports failures in-band
/// with `"status": "error"`, sometimes under HTTP 200.
pub fn parse_time_series(body: Value) -> Result<ProviderRows, ProviderError> {
    let response: TimeSeriesResponse =
        serde_json::from_value(body).map_err(|e| ProviderError::Decode {
            provider: TWELVEDATA_PROVIDER.to_string(),
            reason: e.to_string(),
        })?;

    if response.status.as_deref() == Some("error") {
        return Err(ProviderError::Rejected {
            provider: TWELVEDATA_PROVIDER.to_string(),
            reason: response
                .message
                .unwrap_or_else(|| "unspecified error".to_string()),
        });
    }
    Ok(ProviderRows::TwelveData(response.values))
}

#[async_trait]
impl CandleProvider for TwelveDataCandleProvider {
    fn name(&self) -> &str {
        TWELVEDATA_PROVIDER
    }

    async fn fetch_rows(
        &self,
        symbol: &CanonicalSymbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<ProviderRows, ProviderError> {
        let pair = symbol.display_pair();
        let output_size = limit.clamp(1, MAX_OUTPUT_SIZE).to_string();

        let url = build_url_with_query(
            &self.base_url,
            "/time_series",
            &[
                ("symbol", pair.as_str()),
                ("interval", timeframe.to_twelvedata_string()),
                ("outputsize", output_size.as_str()),
                ("timezone", "UTC"),
                ("apikey", self.api_key.as_str()),
            ],
        )
        .map_err(|e| ProviderError::Transport {
            provider: TWELVEDATA_PROVIDER.to_string(),
            reason: format!("invalid base URL: {}", e),
        })?;

        debug!(
            "TwelveDataCandleProvider: time_series {} {} outputsize={}",
            pair, timeframe, output_size
        );
        let body = get_json(&self.client, TWELVEDATA_PROVIDER, url).await?;
        parse_time_series(body)
    }
}
