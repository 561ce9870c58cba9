use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Buy,
    Sell,
    Neutral,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Buy => write!(f, "BUY"),
            Decision::Sell => write!(f, "SELL"),
            Decision::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Latest indicator values. `None` means not enough history, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub ema20: Option<f64>,
    pub ema50: Option<f64>,
    pub rsi14: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub atr14: Option<f64>,
}

/// Why a decision came out neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NeutralReason {
    /// Fewer bars than the configured decision minimum
    InsufficientHistory { bars: usize, required: usize },
    /// Enough bars but at least one indicator is undefined
    MissingIndicator,
    /// Indicators disagree
    NoConfluence,
}

/// Entry and risk levels, all rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeLevels {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit1: f64,
    pub take_profit2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalResult {
    pub decision: Decision,
    /// Present iff `decision != Neutral`
    pub levels: Option<TradeLevels>,
    pub indicators: IndicatorSet,
    pub neutral_reason: Option<NeutralReason>,
    pub last_close: f64,
    /// Open time (Unix seconds) of the bar the decision was computed on
    pub last_candle_time: i64,
    pub stale: bool,
}

impl SignalResult {
    pub fn entry(&self) -> Option<f64> {
        self.levels.map(|l| l.entry)
    }

    pub fn stop_loss(&self) -> Option<f64> {
        self.levels.map(|l| l.stop_loss)
    }

    pub fn take_profit1(&self) -> Option<f64> {
        self.levels.map(|l| l.take_profit1)
    }

    pub fn take_profit2(&self) -> Option<f64> {
        self.levels.map(|l| l.take_profit2)
    }
}
