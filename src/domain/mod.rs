// Market data model
pub mod market;

// Port interfaces
pub mod ports;

// Signal decision model
pub mod signal;

// Domain-specific error types
pub mod errors;
