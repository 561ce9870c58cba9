use crate::domain::market::Timeframe;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised while turning user text into a canonical symbol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("Symbol not found in input: '{input}'")]
    SymbolNotFound { input: String },
}

/// Failure of a single provider call. Recovered by moving on to the next
/// provider; never retried within the same request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{provider}: transport error: {reason}")]
    Transport { provider: String, reason: String },

    #[error("{provider}: HTTP {status}: {body}")]
    HttpStatus {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider}: could not decode response: {reason}")]
    Decode { provider: String, reason: String },

    #[error("{provider}: no response after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("{provider}: {reason}")]
    Rejected { provider: String, reason: String },
}

/// Result of asking one provider for candles, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AttemptOutcome {
    /// Transport, HTTP or decode failure
    Failed(String),
    /// Responded, but no row survived normalization
    Empty,
    /// Usable candles were returned
    Candles { count: usize, age_seconds: i64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderAttempt {
    pub provider: String,
    pub outcome: AttemptOutcome,
}

impl fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            AttemptOutcome::Failed(reason) => write!(f, "{} failed ({})", self.provider, reason),
            AttemptOutcome::Empty => write!(f, "{} returned no rows", self.provider),
            AttemptOutcome::Candles { count, age_seconds } => write!(
                f,
                "{} returned {} candles, last {}s old",
                self.provider, count, age_seconds
            ),
        }
    }
}

/// Errors related to candle retrieval across all providers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketDataError {
    #[error("No data for {symbol} on {timeframe}: {}", summarize(.attempts))]
    NoDataForTimeframe {
        symbol: String,
        timeframe: Timeframe,
        attempts: Vec<ProviderAttempt>,
    },
}

fn summarize(attempts: &[ProviderAttempt]) -> String {
    if attempts.is_empty() {
        return "no provider configured".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Top-level error returned by the signal service
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_formatting_lists_attempts() {
        let error = MarketDataError::NoDataForTimeframe {
            symbol: "XAUUSD".to_string(),
            timeframe: Timeframe::OneHour,
            attempts: vec![
                ProviderAttempt {
                    provider: "twelvedata".to_string(),
                    outcome: AttemptOutcome::Failed("HTTP 500".to_string()),
                },
                ProviderAttempt {
                    provider: "polygon".to_string(),
                    outcome: AttemptOutcome::Candles {
                        count: 40,
                        age_seconds: 200_000,
                    },
                },
            ],
        };

        let msg = error.to_string();
        assert!(msg.contains("XAUUSD"));
        assert!(msg.contains("1h"));
        assert!(msg.contains("twelvedata failed (HTTP 500)"));
        assert!(msg.contains("polygon returned 40 candles"));
    }

    #[test]
    fn test_no_data_without_providers() {
        let error = MarketDataError::NoDataForTimeframe {
            symbol: "BTCUSDT".to_string(),
            timeframe: Timeframe::FiveMin,
            attempts: vec![],
        };
        assert!(error.to_string().contains("no provider configured"));
    }

    #[test]
    fn test_signal_error_is_transparent() {
        let error: SignalError = NormalizationError::SymbolNotFound {
            input: "xyz".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Symbol not found in input: 'xyz'");
    }
}
