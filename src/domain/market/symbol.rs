use serde::{Deserialize, Serialize};
use std::fmt;

/// Base assets that are always routed as crypto even when quoted in USD.
const CRYPTO_BASES: &[&str] = &[
    "BTC", "ETH", "SOL", "XRP", "BNB", "DOGE", "ADA", "LTC", "DOT", "AVAX", "LINK", "TRX",
    "MATIC", "SHIB", "TON",
];

/// Quote currencies recognised when splitting a canonical symbol, longest first
/// so that `USDT` wins over `USD`.
const QUOTE_CURRENCIES: &[&str] = &[
    "USDT", "USDC", "USD", "EUR", "GBP", "JPY", "CHF", "CAD", "AUD", "NZD",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Crypto,
    ForexMetal,
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetClass::Crypto => write!(f, "crypto"),
            AssetClass::ForexMetal => write!(f, "forex_metal"),
        }
    }
}

/// Uppercase, separator-free ticker such as `XAUUSD` or `BTCUSDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalSymbol(String);

impl CanonicalSymbol {
    /// Builds a canonical symbol from loosely formatted input (`xau/usd`,
    /// `BTC-USDT`). Returns `None` when nothing alphanumeric is left or the
    /// result is not plausibly a ticker.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if cleaned.len() < 3 || cleaned.len() > 12 {
            return None;
        }
        if !cleaned.chars().any(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        Some(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Asset class derived from the suffix or a fixed set of crypto bases.
    pub fn asset_class(&self) -> AssetClass {
        if self.0.ends_with("USDT") {
            return AssetClass::Crypto;
        }
        let base = self.split().map(|(base, _)| base).unwrap_or(self.0.as_str());
        if CRYPTO_BASES.contains(&base) {
            AssetClass::Crypto
        } else {
            AssetClass::ForexMetal
        }
    }

    /// Splits into `(base, quote)` using the known quote currencies.
    pub fn split(&self) -> Option<(&str, &str)> {
        for quote in QUOTE_CURRENCIES {
            if self.0.len() > quote.len() && self.0.ends_with(quote) {
                let base = &self.0[..self.0.len() - quote.len()];
                return Some((base, quote));
            }
        }
        if self.0.len() == 6 {
            return Some(self.0.split_at(3));
        }
        None
    }

    /// Whether the symbol ends with one of the recognised quote currencies.
    pub fn has_known_quote(&self) -> bool {
        QUOTE_CURRENCIES
            .iter()
            .any(|q| self.0.len() > q.len() && self.0.ends_with(q))
    }

    /// Slash-separated rendering used for quotes and slash-style providers
    /// (`XAU/USD`). Falls back to the bare ticker when no split is known.
    pub fn display_pair(&self) -> String {
        match self.split() {
            Some((base, quote)) => format!("{}/{}", base, quote),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for CanonicalSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> CanonicalSymbol {
        CanonicalSymbol::parse(s).unwrap()
    }

    #[test]
    fn test_parse_strips_separators() {
        assert_eq!(sym("xau/usd").as_str(), "XAUUSD");
        assert_eq!(sym("BTC-USDT").as_str(), "BTCUSDT");
        assert_eq!(sym(" eur usd ").as_str(), "EURUSD");
        assert!(CanonicalSymbol::parse("ab").is_none());
        assert!(CanonicalSymbol::parse("123456").is_none());
    }

    #[test]
    fn test_asset_class() {
        assert_eq!(sym("BTCUSDT").asset_class(), AssetClass::Crypto);
        assert_eq!(sym("ETHUSD").asset_class(), AssetClass::Crypto);
        assert_eq!(sym("PEPEUSDT").asset_class(), AssetClass::Crypto);
        assert_eq!(sym("XAUUSD").asset_class(), AssetClass::ForexMetal);
        assert_eq!(sym("EURUSD").asset_class(), AssetClass::ForexMetal);
        assert_eq!(sym("USDJPY").asset_class(), AssetClass::ForexMetal);
    }

    #[test]
    fn test_display_pair() {
        assert_eq!(sym("XAUUSD").display_pair(), "XAU/USD");
        assert_eq!(sym("BTCUSDT").display_pair(), "BTC/USDT");
        assert_eq!(sym("USDJPY").display_pair(), "USD/JPY");
        assert_eq!(sym("WTIUSD").display_pair(), "WTI/USD");
        assert_eq!(sym("DOGEUSDT").display_pair(), "DOGE/USDT");
    }

    #[test]
    fn test_display_pair_reparses_to_same_symbol() {
        for s in ["XAUUSD", "BTCUSDT", "GBPUSD", "DOGEUSDT"] {
            let original = sym(s);
            assert_eq!(sym(&original.display_pair()), original);
        }
    }
}
