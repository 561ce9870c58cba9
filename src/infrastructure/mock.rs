use crate::domain::errors::ProviderError;
use crate::domain::market::{Candle, CanonicalSymbol, Timeframe};
use crate::domain::ports::{CandleProvider, PolygonAgg, ProviderRows};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// What a [`MockCandleProvider`] answers on every call.
#[derive(Debug, Clone)]
enum Script {
    Rows(ProviderRows),
    Fail(ProviderError),
}

/// In-memory [`CandleProvider`] returning the same scripted answer on every
/// call. Clones share the call counter.
#[derive(Clone)]
pub struct MockCandleProvider {
    name: String,
    script: Script,
    delay: Option<Duration>,
    only_for: Option<Timeframe>,
    calls: Arc<AtomicUsize>,
}

impl MockCandleProvider {
    /// Serves `candles` as Polygon-style aggregates (`t` in milliseconds).
    pub fn with_candles(name: &str, candles: &[Candle]) -> Self {
        let rows = candles
            .iter()
            .map(|c| PolygonAgg {
                t: Some(json!(c.timestamp * 1000)),
                o: Some(json!(c.open)),
                h: Some(json!(c.high)),
                l: Some(json!(c.low)),
                c: Some(json!(c.close)),
            })
            .collect();
        Self::with_rows(name, ProviderRows::Polygon(rows))
    }

    pub fn with_rows(name: &str, rows: ProviderRows) -> Self {
        Self::scripted(name, Script::Rows(rows))
    }

    /// Always fails with a transport error.
    pub fn failing(name: &str) -> Self {
        Self::scripted(
            name,
            Script::Fail(ProviderError::Transport {
                provider: name.to_string(),
                reason: "connection refused".to_string(),
            }),
        )
    }

    pub fn empty(name: &str) -> Self {
        Self::with_rows(name, ProviderRows::Polygon(Vec::new()))
    }

    /// Sleeps for `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answers with no rows for every timeframe except `timeframe`.
    pub fn only_for(mut self, timeframe: Timeframe) -> Self {
        self.only_for = Some(timeframe);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn scripted(name: &str, script: Script) -> Self {
        Self {
            name: name.to_string(),
            script,
            delay: None,
            only_for: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl CandleProvider for MockCandleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_rows(
        &self,
        symbol: &CanonicalSymbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<ProviderRows, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!(
            "MockCandleProvider[{}]: {} {} limit={}",
            self.name, symbol, timeframe, limit
        );

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.only_for.is_some_and(|tf| tf != timeframe) {
            return Ok(ProviderRows::Polygon(Vec::new()));
        }

        match &self.script {
            Script::Rows(rows) => Ok(rows.clone()),
            Script::Fail(error) => Err(error.clone()),
        }
    }
}

/// Builds consistent candles from a close series. The last candle opens at
/// `last_open`; earlier ones step back by `timeframe`. Each candle opens at
/// the previous close and spans `spread` above and below its body.
pub fn candles_from_closes(
    closes: &[f64],
    last_open: i64,
    timeframe: Timeframe,
    spread: f64,
) -> Vec<Candle> {
    let step = timeframe.to_seconds();
    let first_open = last_open - step * (closes.len() as i64 - 1);

    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle::new(
                first_open + step * i as i64,
                open,
                open.max(close) + spread,
                open.min(close) - spread,
                close,
            )
        })
        .collect()
}
