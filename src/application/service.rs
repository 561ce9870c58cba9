use crate::application::formatting::{format_price, format_signal};
use crate::application::market_data::OhlcGateway;
use crate::application::normalization::{ResolvedSymbol, detect_timeframe, normalize};
use crate::application::signals::DecisionEngine;
use crate::config::SignalEnvConfig;
use crate::domain::errors::{MarketDataError, SignalError};
use crate::domain::market::{AssetClass, Candle, CanonicalSymbol, OhlcResult, Timeframe};
use crate::domain::signal::SignalResult;
use crate::infrastructure::observability::Metrics;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Symbol and timeframe parsed from user text, before any network call.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRequest {
    pub resolved: ResolvedSymbol,
    pub display_pair: String,
    pub timeframe: Timeframe,
    /// Whether the timeframe came from the text rather than the default
    pub timeframe_detected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignalReport {
    pub symbol: CanonicalSymbol,
    pub asset_class: AssetClass,
    pub requested_timeframe: Timeframe,
    /// Timeframe the signal was computed on; coarser than requested after a fallback
    pub timeframe: Timeframe,
    pub provider_used: String,
    pub candles: usize,
    pub age_seconds: i64,
    pub signal: SignalResult,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    pub symbol: CanonicalSymbol,
    pub asset_class: AssetClass,
    pub requested_timeframe: Timeframe,
    pub timeframe: Timeframe,
    pub provider_used: String,
    pub age_seconds: i64,
    pub is_stale: bool,
    pub candle: Candle,
    pub text: String,
}

/// Text in, report out: normalize, resolve, fetch, then decide or quote.
#[derive(Clone)]
pub struct SignalService {
    gateway: OhlcGateway,
    engine: DecisionEngine,
    config: SignalEnvConfig,
    metrics: Option<Metrics>,
}

impl SignalService {
    pub fn new(gateway: OhlcGateway, config: SignalEnvConfig) -> Self {
        Self {
            gateway,
            engine: DecisionEngine::new(config.min_bars),
            config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Resolves the symbol and timeframe. The timeframe is looked for in
    /// `raw_timeframe` first, then in the symbol text, then `default`.
    pub fn resolve(
        &self,
        raw_symbol: &str,
        raw_timeframe: Option<&str>,
        default: Timeframe,
    ) -> Result<ResolvedRequest, SignalError> {
        let resolved = normalize(raw_symbol)?;
        let detected = raw_timeframe
            .and_then(detect_timeframe)
            .or_else(|| detect_timeframe(raw_symbol));

        Ok(ResolvedRequest {
            display_pair: resolved.symbol.display_pair(),
            resolved,
            timeframe: detected.unwrap_or(default),
            timeframe_detected: detected.is_some(),
        })
    }

    pub async fn signal(
        &self,
        raw_symbol: &str,
        raw_timeframe: Option<&str>,
    ) -> Result<SignalReport, SignalError> {
        self.signal_at(raw_symbol, raw_timeframe, Utc::now()).await
    }

    #[instrument(skip(self, now))]
    pub async fn signal_at(
        &self,
        raw_symbol: &str,
        raw_timeframe: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SignalReport, SignalError> {
        let request = self.resolve(raw_symbol, raw_timeframe, self.config.signal_default_timeframe)?;
        let symbol = &request.resolved.symbol;
        let ohlc = self.fetch_with_fallback(symbol, request.timeframe, now).await?;

        let signal = self.engine.decide(&ohlc.series, ohlc.timeframe, ohlc.is_stale);
        let text = format_signal(&signal, symbol, ohlc.timeframe);

        if let Some(metrics) = &self.metrics {
            metrics.inc_signals(&signal.decision.to_string());
        }
        info!(
            "SignalService: {} {} -> {} via {}",
            symbol, ohlc.timeframe, signal.decision, ohlc.provider_used
        );

        Ok(SignalReport {
            symbol: symbol.clone(),
            asset_class: request.resolved.asset_class,
            requested_timeframe: request.timeframe,
            timeframe: ohlc.timeframe,
            candles: ohlc.series.len(),
            provider_used: ohlc.provider_used,
            age_seconds: ohlc.age_seconds,
            signal,
            text,
        })
    }

    pub async fn price(
        &self,
        raw_symbol: &str,
        raw_timeframe: Option<&str>,
    ) -> Result<PriceReport, SignalError> {
        self.price_at(raw_symbol, raw_timeframe, Utc::now()).await
    }

    #[instrument(skip(self, now))]
    pub async fn price_at(
        &self,
        raw_symbol: &str,
        raw_timeframe: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<PriceReport, SignalError> {
        let request = self.resolve(raw_symbol, raw_timeframe, self.config.price_default_timeframe)?;
        let symbol = &request.resolved.symbol;
        let ohlc = self.fetch_with_fallback(symbol, request.timeframe, now).await?;

        let candle = *ohlc.latest_closed(now);
        let text = format_price(&candle, symbol);

        Ok(PriceReport {
            symbol: symbol.clone(),
            asset_class: request.resolved.asset_class,
            requested_timeframe: request.timeframe,
            timeframe: ohlc.timeframe,
            provider_used: ohlc.provider_used,
            age_seconds: ohlc.age_seconds,
            is_stale: ohlc.is_stale,
            candle,
            text,
        })
    }

    /// Fetches `timeframe`, then each coarser timeframe in turn when enabled.
    /// On exhaustion the error for the requested timeframe is returned.
    async fn fetch_with_fallback(
        &self,
        symbol: &CanonicalSymbol,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<OhlcResult, MarketDataError> {
        let limit = self.config.candle_limit;
        let first_error = match self.gateway.fetch_candles_at(symbol, timeframe, limit, now).await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        if !self.config.coarser_fallback {
            return Err(first_error);
        }

        let mut next = timeframe.coarser();
        while let Some(coarser) = next {
            debug!("SignalService: {} has no {} data, trying {}", symbol, timeframe, coarser);
            if let Ok(result) = self.gateway.fetch_candles_at(symbol, coarser, limit, now).await {
                info!("SignalService: {} fell back from {} to {}", symbol, timeframe, coarser);
                return Ok(result);
            }
            next = coarser.coarser();
        }
        Err(first_error)
    }
}
