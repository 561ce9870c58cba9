//! Push-based observability for Rustsignal
//!
//! Metrics are collected in-process and rendered on demand; nothing here
//! listens for incoming requests.

pub mod metrics;

pub use metrics::Metrics;
