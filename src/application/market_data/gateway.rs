use super::rows::to_candles;
use crate::domain::errors::{AttemptOutcome, MarketDataError, ProviderAttempt, ProviderError};
use crate::domain::market::{AssetClass, CandleSeries, CanonicalSymbol, Freshness, OhlcResult, Timeframe};
use crate::domain::ports::CandleProvider;
use crate::infrastructure::observability::Metrics;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Candidates with at least this many candles are preferred over shorter ones.
pub const MIN_PREFERRED_CANDLES: usize = 30;

/// Fixed provider priority per asset class, built once at start.
#[derive(Clone, Default)]
pub struct ProviderRoutes {
    crypto: Vec<Arc<dyn CandleProvider>>,
    forex_metal: Vec<Arc<dyn CandleProvider>>,
}

impl ProviderRoutes {
    pub fn new(
        crypto: Vec<Arc<dyn CandleProvider>>,
        forex_metal: Vec<Arc<dyn CandleProvider>>,
    ) -> Self {
        Self {
            crypto,
            forex_metal,
        }
    }

    pub fn for_class(&self, asset_class: AssetClass) -> &[Arc<dyn CandleProvider>] {
        match asset_class {
            AssetClass::Crypto => &self.crypto,
            AssetClass::ForexMetal => &self.forex_metal,
        }
    }

    pub fn provider_names(&self, asset_class: AssetClass) -> Vec<String> {
        self.for_class(asset_class)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }
}

/// Queries providers in priority order and picks one candle series.
///
/// Providers are called sequentially, each under its own timeout. A failing
/// provider is skipped, never retried within the same request. Nothing is
/// cached: freshness is always measured at call time.
#[derive(Clone)]
pub struct OhlcGateway {
    routes: ProviderRoutes,
    timeout: Duration,
    metrics: Option<Metrics>,
}

impl OhlcGateway {
    pub fn new(routes: ProviderRoutes, timeout: Duration) -> Self {
        Self {
            routes,
            timeout,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn fetch_candles(
        &self,
        symbol: &CanonicalSymbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<OhlcResult, MarketDataError> {
        self.fetch_candles_at(symbol, timeframe, limit, Utc::now())
            .await
    }

    /// [`fetch_candles`](Self::fetch_candles) with freshness measured at `now`.
    #[instrument(skip_all, fields(symbol = %symbol, timeframe = %timeframe, limit))]
    pub async fn fetch_candles_at(
        &self,
        symbol: &CanonicalSymbol,
        timeframe: Timeframe,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<OhlcResult, MarketDataError> {
        let providers = self.routes.for_class(symbol.asset_class());
        let mut attempts = Vec::with_capacity(providers.len());
        // Accepted candidates, in provider priority order.
        let mut pool: Vec<OhlcResult> = Vec::new();

        for provider in providers {
            let name = provider.name();
            let started = Instant::now();
            let fetched =
                tokio::time::timeout(self.timeout, provider.fetch_rows(symbol, timeframe, limit))
                    .await;
            let latency = started.elapsed().as_secs_f64();

            let rows = match fetched {
                Ok(Ok(rows)) => rows,
                Ok(Err(e)) => {
                    warn!("OhlcGateway: {} failed for {}: {}", name, symbol, e);
                    self.record(name, "error", latency);
                    attempts.push(failed(name, &e));
                    continue;
                }
                Err(_) => {
                    let e = ProviderError::Timeout {
                        provider: name.to_string(),
                        timeout_ms: self.timeout.as_millis() as u64,
                    };
                    warn!("OhlcGateway: {}", e);
                    self.record(name, "timeout", latency);
                    attempts.push(failed(name, &e));
                    continue;
                }
            };

            let (candles, dropped) = to_candles(&rows);
            if dropped > 0 {
                debug!(
                    "OhlcGateway: {} dropped {} unparseable rows for {}",
                    name, dropped, symbol
                );
            }

            let Some(series) = CandleSeries::from_unsorted(candles, limit) else {
                info!("OhlcGateway: {} returned no usable candles for {}", name, symbol);
                self.record(name, "empty", latency);
                attempts.push(ProviderAttempt {
                    provider: name.to_string(),
                    outcome: AttemptOutcome::Empty,
                });
                continue;
            };

            let inconsistent = series.inconsistent_count();
            if inconsistent > 0 {
                debug!(
                    "OhlcGateway: {} has {} bars with high/low outside open/close",
                    name, inconsistent
                );
            }

            let freshness = Freshness::measure(&series, timeframe, now);
            attempts.push(ProviderAttempt {
                provider: name.to_string(),
                outcome: AttemptOutcome::Candles {
                    count: series.len(),
                    age_seconds: freshness.age_seconds,
                },
            });

            if freshness.is_too_old {
                warn!(
                    "OhlcGateway: {} data for {} rejected, last candle {}s old",
                    name, symbol, freshness.age_seconds
                );
                self.record(name, "too_old", latency);
                continue;
            }
            self.record(name, "ok", latency);

            let sufficient = series.len() >= MIN_PREFERRED_CANDLES && !freshness.is_stale;
            pool.push(OhlcResult::new(
                symbol.clone(),
                timeframe,
                series,
                name,
                freshness,
            ));

            if sufficient {
                debug!("OhlcGateway: {} is sufficient, skipping remaining providers", name);
                break;
            }
        }

        match select(pool) {
            Some(result) => {
                info!(
                    "OhlcGateway: {} {} from {} ({} candles, age {}s{})",
                    result.symbol,
                    result.timeframe,
                    result.provider_used,
                    result.series.len(),
                    result.age_seconds,
                    if result.is_stale { ", stale" } else { "" }
                );
                if let Some(metrics) = &self.metrics {
                    metrics.last_candle_age_seconds.set(result.age_seconds as f64);
                    if result.is_stale {
                        metrics.inc_stale(timeframe.label());
                    }
                }
                Ok(result)
            }
            None => {
                warn!(
                    "OhlcGateway: no data for {} {} after {} attempts",
                    symbol,
                    timeframe,
                    attempts.len()
                );
                if let Some(metrics) = &self.metrics {
                    metrics.inc_no_data(timeframe.label());
                }
                Err(MarketDataError::NoDataForTimeframe {
                    symbol: symbol.to_string(),
                    timeframe,
                    attempts,
                })
            }
        }
    }

    fn record(&self, provider: &str, outcome: &str, latency: f64) {
        if let Some(metrics) = &self.metrics {
            metrics.observe_provider(provider, outcome, latency);
        }
    }
}

fn failed(provider: &str, error: &ProviderError) -> ProviderAttempt {
    ProviderAttempt {
        provider: provider.to_string(),
        outcome: AttemptOutcome::Failed(error.to_string()),
    }
}

/// First fresh candidate with enough candles, else the first with enough
/// candles even if stale, else the first candidate at all.
fn select(pool: Vec<OhlcResult>) -> Option<OhlcResult> {
    let enough = |r: &OhlcResult| r.series.len() >= MIN_PREFERRED_CANDLES;

    let index = pool
        .iter()
        .position(|r| enough(r) && !r.is_stale)
        .or_else(|| pool.iter().position(enough))
        .unwrap_or(0);

    pool.into_iter().nth(index)
}
