//! Prometheus metrics definitions for Rustsignal
//!
//! All metrics use the `rustsignal_` prefix and live on a private registry.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for the candle gateway and signal service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Provider calls by provider and outcome (`ok`, `empty`, `error`, `timeout`)
    pub provider_requests_total: CounterVec,
    /// Provider call latency in seconds
    pub provider_latency_seconds: HistogramVec,
    /// Results returned with the stale flag set, by timeframe
    pub stale_results_total: CounterVec,
    /// Requests that exhausted every provider, by timeframe
    pub no_data_total: CounterVec,
    /// Decisions produced, by decision
    pub signals_total: CounterVec,
    /// Age of the last candle of the most recent successful fetch
    pub last_candle_age_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all collectors registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let provider_requests_total = CounterVec::new(
            Opts::new(
                "rustsignal_provider_requests_total",
                "Candle provider calls by outcome",
            ),
            &["provider", "outcome"],
        )?;
        registry.register(Box::new(provider_requests_total.clone()))?;

        let provider_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "rustsignal_provider_latency_seconds",
                "Candle provider latency in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["provider"],
        )?;
        registry.register(Box::new(provider_latency_seconds.clone()))?;

        let stale_results_total = CounterVec::new(
            Opts::new(
                "rustsignal_stale_results_total",
                "Candle results flagged stale",
            ),
            &["timeframe"],
        )?;
        registry.register(Box::new(stale_results_total.clone()))?;

        let no_data_total = CounterVec::new(
            Opts::new(
                "rustsignal_no_data_total",
                "Requests for which no provider returned usable candles",
            ),
            &["timeframe"],
        )?;
        registry.register(Box::new(no_data_total.clone()))?;

        let signals_total = CounterVec::new(
            Opts::new("rustsignal_signals_total", "Signal decisions produced"),
            &["decision"],
        )?;
        registry.register(Box::new(signals_total.clone()))?;

        let last_candle_age_seconds = Gauge::with_opts(Opts::new(
            "rustsignal_last_candle_age_seconds",
            "Age of the newest candle in the last successful fetch",
        ))?;
        registry.register(Box::new(last_candle_age_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            provider_requests_total,
            provider_latency_seconds,
            stale_results_total,
            no_data_total,
            signals_total,
            last_candle_age_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    /// Record one provider call
    pub fn observe_provider(&self, provider: &str, outcome: &str, latency: f64) {
        self.provider_requests_total
            .with_label_values(&[provider, outcome])
            .inc();
        self.provider_latency_seconds
            .with_label_values(&[provider])
            .observe(latency);
    }

    pub fn inc_stale(&self, timeframe: &str) {
        self.stale_results_total.with_label_values(&[timeframe]).inc();
    }

    pub fn inc_no_data(&self, timeframe: &str) {
        self.no_data_total.with_label_values(&[timeframe]).inc();
    }

    pub fn inc_signals(&self, decision: &str) {
        self.signals_total.with_label_values(&[decision]).inc();
    }
}
