//! Natural-language aliases for supported instruments.
//!
//! Phrases are written as users type them; keys are run through
//! [`normalize_text`] once when the table is first used.

use super::text::normalize_text;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// `(phrase, canonical symbol)`
const ALIASES: &[(&str, &str)] = &[
    // Gold
    ("ذهب", "XAUUSD"),
    ("الذهب", "XAUUSD"),
    ("دهب", "XAUUSD"),
    ("اونصة الذهب", "XAUUSD"),
    ("اونصه", "XAUUSD"),
    ("gold", "XAUUSD"),
    ("gold spot", "XAUUSD"),
    ("xau", "XAUUSD"),
    ("xauusd", "XAUUSD"),
    ("xau/usd", "XAUUSD"),
    // Silver
    ("فضة", "XAGUSD"),
    ("الفضة", "XAGUSD"),
    ("silver", "XAGUSD"),
    ("xag", "XAGUSD"),
    ("xagusd", "XAGUSD"),
    ("xag/usd", "XAGUSD"),
    // Oil
    ("نفط", "WTIUSD"),
    ("النفط", "WTIUSD"),
    ("بترول", "WTIUSD"),
    ("البترول", "WTIUSD"),
    ("خام", "WTIUSD"),
    ("النفط الخام", "WTIUSD"),
    ("oil", "WTIUSD"),
    ("crude", "WTIUSD"),
    ("crude oil", "WTIUSD"),
    ("wti", "WTIUSD"),
    ("usoil", "WTIUSD"),
    // Majors
    ("يورو", "EURUSD"),
    ("اليورو", "EURUSD"),
    ("يورو دولار", "EURUSD"),
    ("euro", "EURUSD"),
    ("eur", "EURUSD"),
    ("eurusd", "EURUSD"),
    ("eur/usd", "EURUSD"),
    ("باوند", "GBPUSD"),
    ("الباوند", "GBPUSD"),
    ("جنيه استرليني", "GBPUSD"),
    ("الجنيه الاسترليني", "GBPUSD"),
    ("استرليني", "GBPUSD"),
    ("pound", "GBPUSD"),
    ("sterling", "GBPUSD"),
    ("cable", "GBPUSD"),
    ("gbp", "GBPUSD"),
    ("gbpusd", "GBPUSD"),
    ("الين", "USDJPY"),
    ("ين ياباني", "USDJPY"),
    ("دولار ين", "USDJPY"),
    ("yen", "USDJPY"),
    ("jpy", "USDJPY"),
    ("usdjpy", "USDJPY"),
    ("فرنك", "USDCHF"),
    ("فرنك سويسري", "USDCHF"),
    ("franc", "USDCHF"),
    ("swissy", "USDCHF"),
    ("usdchf", "USDCHF"),
    ("دولار استرالي", "AUDUSD"),
    ("الاسترالي", "AUDUSD"),
    ("aussie", "AUDUSD"),
    ("audusd", "AUDUSD"),
    ("دولار كندي", "USDCAD"),
    ("الكندي", "USDCAD"),
    ("loonie", "USDCAD"),
    ("usdcad", "USDCAD"),
    ("دولار نيوزلندي", "NZDUSD"),
    ("kiwi", "NZDUSD"),
    ("nzdusd", "NZDUSD"),
    // Crypto
    ("بيتكوين", "BTCUSDT"),
    ("بتكوين", "BTCUSDT"),
    ("البيتكوين", "BTCUSDT"),
    ("bitcoin", "BTCUSDT"),
    ("btc", "BTCUSDT"),
    ("btcusdt", "BTCUSDT"),
    ("btcusd", "BTCUSDT"),
    ("ايثريوم", "ETHUSDT"),
    ("ايثيريوم", "ETHUSDT"),
    ("الايثريوم", "ETHUSDT"),
    ("اثيريوم", "ETHUSDT"),
    ("ethereum", "ETHUSDT"),
    ("ether", "ETHUSDT"),
    ("eth", "ETHUSDT"),
    ("ethusdt", "ETHUSDT"),
    ("سولانا", "SOLUSDT"),
    ("solana", "SOLUSDT"),
    ("sol", "SOLUSDT"),
    ("ريبل", "XRPUSDT"),
    ("ripple", "XRPUSDT"),
    ("xrp", "XRPUSDT"),
    ("بينانس", "BNBUSDT"),
    ("bnb", "BNBUSDT"),
    ("دوج", "DOGEUSDT"),
    ("دوجكوين", "DOGEUSDT"),
    ("dogecoin", "DOGEUSDT"),
    ("doge", "DOGEUSDT"),
    ("كاردانو", "ADAUSDT"),
    ("cardano", "ADAUSDT"),
    ("ada", "ADAUSDT"),
    ("لايتكوين", "LTCUSDT"),
    ("litecoin", "LTCUSDT"),
    ("ltc", "LTCUSDT"),
];

/// Normalized phrase -> canonical symbol, built once.
pub static ALIAS_TABLE: LazyLock<BTreeMap<String, &'static str>> = LazyLock::new(|| {
    ALIASES
        .iter()
        .map(|(phrase, symbol)| (normalize_text(phrase), *symbol))
        .collect()
});

/// Exact lookup of an already normalized phrase.
pub fn lookup(normalized: &str) -> Option<&'static str> {
    ALIAS_TABLE.get(normalized).copied()
}

static MAX_PHRASE_WORDS: LazyLock<usize> = LazyLock::new(|| {
    ALIAS_TABLE
        .keys()
        .map(|k| k.split(' ').count())
        .max()
        .unwrap_or(1)
});

/// Longest alias phrase in words; bounds the n-gram scan.
pub fn max_phrase_words() -> usize {
    *MAX_PHRASE_WORDS
}
