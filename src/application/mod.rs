// Text to canonical symbol and timeframe
pub mod normalization;

// Pure indicator math
pub mod indicators;

// Provider fall-through and candle selection
pub mod market_data;

// Decision and risk levels
pub mod signals;

// Fixed text contracts
pub mod formatting;

// Request orchestration
pub mod service;

pub use service::{PriceReport, ResolvedRequest, SignalReport, SignalService};
