//! User text to canonical identifiers.

pub mod aliases;
pub mod symbol_normalizer;
pub mod text;
pub mod timeframe_resolver;

pub use symbol_normalizer::{MatchKind, ResolvedSymbol, normalize};
pub use timeframe_resolver::{detect_timeframe, resolve_timeframe};
