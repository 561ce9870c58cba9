//! Directional decision and risk levels from an indicator set.

pub mod decision_engine;
pub mod levels;

pub use decision_engine::{DEFAULT_MIN_BARS, DecisionEngine, MIN_BARS_RANGE};
pub use levels::{price_decimals, round_price};
