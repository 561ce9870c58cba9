use super::symbol::CanonicalSymbol;
use super::timeframe::Timeframe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Data older than this is rejected outright instead of being flagged stale.
pub const MAX_CANDLE_AGE_SECS: i64 = 24 * 60 * 60;

/// One OHLC bar. `timestamp` is the bar open time in Unix seconds.
///
/// `high >= max(open, close)` and `low <= min(open, close)` are expected but
/// not enforced; see [`Candle::is_consistent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// Whether high/low actually bracket open/close.
    pub fn is_consistent(&self) -> bool {
        self.high >= self.open.max(self.close) && self.low <= self.open.min(self.close)
    }
}

/// Non-empty candle sequence, strictly ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Sorts, deduplicates by timestamp (the last occurrence wins) and keeps
    /// the most recent `limit` candles. Returns `None` if nothing is left.
    pub fn from_unsorted(candles: Vec<Candle>, limit: usize) -> Option<Self> {
        let mut by_ts: BTreeMap<i64, Candle> = BTreeMap::new();
        for candle in candles {
            by_ts.insert(candle.timestamp, candle);
        }

        let mut candles: Vec<Candle> = by_ts.into_values().collect();
        if candles.len() > limit {
            candles.drain(..candles.len() - limit);
        }

        if candles.is_empty() {
            None
        } else {
            Some(Self { candles })
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn last(&self) -> &Candle {
        // Construction guarantees at least one candle.
        &self.candles[self.candles.len() - 1]
    }

    pub fn previous(&self) -> Option<&Candle> {
        self.candles.len().checked_sub(2).map(|i| &self.candles[i])
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    /// Number of bars whose high/low do not bracket open/close.
    pub fn inconsistent_count(&self) -> usize {
        self.candles.iter().filter(|c| !c.is_consistent()).count()
    }
}

/// Freshness of a series measured at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Freshness {
    pub age_seconds: i64,
    pub is_stale: bool,
    pub is_too_old: bool,
}

impl Freshness {
    pub fn measure(series: &CandleSeries, timeframe: Timeframe, now: DateTime<Utc>) -> Self {
        let age_seconds = now.timestamp().saturating_sub(series.last().timestamp);
        Self {
            age_seconds,
            is_stale: age_seconds > timeframe.staleness_threshold_secs(),
            is_too_old: age_seconds > MAX_CANDLE_AGE_SECS,
        }
    }
}

/// Candle data returned by the gateway for one request.
#[derive(Debug, Clone, Serialize)]
pub struct OhlcResult {
    pub symbol: CanonicalSymbol,
    pub timeframe: Timeframe,
    pub series: CandleSeries,
    pub provider_used: String,
    pub age_seconds: i64,
    pub is_stale: bool,
    pub is_too_old: bool,
}

impl OhlcResult {
    pub fn new(
        symbol: CanonicalSymbol,
        timeframe: Timeframe,
        series: CandleSeries,
        provider_used: impl Into<String>,
        freshness: Freshness,
    ) -> Self {
        Self {
            symbol,
            timeframe,
            series,
            provider_used: provider_used.into(),
            age_seconds: freshness.age_seconds,
            is_stale: freshness.is_stale,
            is_too_old: freshness.is_too_old,
        }
    }

    /// Latest bar whose interval has fully elapsed at `now`. If the last bar
    /// is still forming the previous one is used; a lone forming bar is
    /// returned as is.
    pub fn latest_closed(&self, now: DateTime<Utc>) -> &Candle {
        let last = self.series.last();
        let closes_at = last.timestamp.saturating_add(self.timeframe.to_seconds());
        if closes_at <= now.timestamp() {
            return last;
        }
        self.series.previous().unwrap_or(last)
    }
}
