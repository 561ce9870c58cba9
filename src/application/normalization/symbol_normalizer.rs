use super::aliases;
use super::text::{destem, fold_digits, normalize_text};
use crate::domain::errors::NormalizationError;
use crate::domain::market::{AssetClass, CanonicalSymbol};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

static SLASH_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,5})\s*/\s*([a-z]{3,5})\b").expect("slash pair pattern is valid")
});
static BARE_TICKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{6,10}\b").expect("bare ticker pattern is valid"));

/// How the symbol was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    ExactAlias,
    PhraseAlias,
    DestemmedAlias,
    TickerPattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSymbol {
    pub symbol: CanonicalSymbol,
    pub asset_class: AssetClass,
    pub matched_by: MatchKind,
}

impl ResolvedSymbol {
    fn new(symbol: CanonicalSymbol, matched_by: MatchKind) -> Self {
        Self {
            asset_class: symbol.asset_class(),
            symbol,
            matched_by,
        }
    }
}

/// Resolves free text (`"price of gold"`, `"إشارة بيتكوين"`, `"EUR/USD"`)
/// to a canonical symbol and its asset class.
pub fn normalize(raw: &str) -> Result<ResolvedSymbol, NormalizationError> {
    let normalized = normalize_text(raw);

    let resolved = match_exact(&normalized)
        .or_else(|| match_ngrams(&normalized))
        .or_else(|| match_ticker_pattern(raw));

    match resolved {
        Some(resolved) => {
            debug!(
                "SymbolNormalizer: '{}' -> {} ({:?})",
                raw, resolved.symbol, resolved.matched_by
            );
            Ok(resolved)
        }
        None => Err(NormalizationError::SymbolNotFound {
            input: raw.to_string(),
        }),
    }
}

fn alias_symbol(phrase: &str, kind: MatchKind) -> Option<ResolvedSymbol> {
    let target = aliases::lookup(phrase)?;
    CanonicalSymbol::parse(target).map(|s| ResolvedSymbol::new(s, kind))
}

fn match_exact(normalized: &str) -> Option<ResolvedSymbol> {
    if normalized.is_empty() {
        return None;
    }
    alias_symbol(normalized, MatchKind::ExactAlias)
}

/// Scans windows as long as the longest alias down to single words, left to
/// right. Each window is tried verbatim and then with clitics stripped from
/// every word.
fn match_ngrams(normalized: &str) -> Option<ResolvedSymbol> {
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    let longest = aliases::max_phrase_words().min(tokens.len());

    for n in (1..=longest).rev() {
        for window in tokens.windows(n) {
            let phrase = window.join(" ");
            if let Some(found) = alias_symbol(&phrase, MatchKind::PhraseAlias) {
                return Some(found);
            }

            let destemmed = window.iter().map(|t| destem(t)).collect::<Vec<_>>().join(" ");
            if destemmed != phrase
                && let Some(found) = alias_symbol(&destemmed, MatchKind::DestemmedAlias)
            {
                return Some(found);
            }
        }
    }
    None
}

/// `XXX/YYY` anywhere (any case), otherwise an upper-case `XXXYYY` run of
/// 6-10 letters. Among bare runs, one ending in a known quote currency wins.
fn match_ticker_pattern(raw: &str) -> Option<ResolvedSymbol> {
    let folded = fold_digits(raw);

    if let Some(caps) = SLASH_PAIR.captures(&folded) {
        let joined = format!("{}{}", &caps[1], &caps[2]);
        if let Some(symbol) = CanonicalSymbol::parse(&joined) {
            return Some(ResolvedSymbol::new(symbol, MatchKind::TickerPattern));
        }
    }

    let candidates: Vec<CanonicalSymbol> = BARE_TICKER
        .find_iter(&folded)
        .filter_map(|m| CanonicalSymbol::parse(m.as_str()))
        .collect();

    let preferred = candidates
        .iter()
        .position(CanonicalSymbol::has_known_quote)
        .unwrap_or(0);

    candidates
        .into_iter()
        .nth(preferred)
        .map(|symbol| ResolvedSymbol::new(symbol, MatchKind::TickerPattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str) -> String {
        normalize(raw).unwrap().symbol.to_string()
    }

    #[test]
    fn test_exact_aliases() {
        assert_eq!(resolve("ذهب"), "XAUUSD");
        assert_eq!(resolve("  GOLD "), "XAUUSD");
        assert_eq!(resolve("فضة"), "XAGUSD");
        assert_eq!(normalize("ذهب").unwrap().matched_by, MatchKind::ExactAlias);
    }

    #[test]
    fn test_phrase_in_sentence() {
        assert_eq!(resolve("price of gold"), "XAUUSD");
        assert_eq!(resolve("سعر الذهب الان"), "XAUUSD");
        assert_eq!(resolve("what about crude oil today"), "WTIUSD");
    }

    #[test]
    fn test_longer_phrase_wins() {
        // "دولار ين" must beat any single-word reading
        assert_eq!(resolve("اشاره دولار ين"), "USDJPY");
        assert_eq!(resolve("سعر الجنيه الاسترليني"), "GBPUSD");
    }

    #[test]
    fn test_destemmed_clitics() {
        let resolved = normalize("وبالبيتكوين شو الوضع").unwrap();
        assert_eq!(resolved.symbol.as_str(), "BTCUSDT");
        assert_eq!(resolved.matched_by, MatchKind::DestemmedAlias);
    }

    #[test]
    fn test_diacritics_and_signal_wording() {
        assert_eq!(resolve("إشارة بيتكوين على الساعة"), "BTCUSDT");
        assert_eq!(resolve("ذَهَب"), "XAUUSD");
    }

    #[test]
    fn test_ticker_patterns() {
        assert_eq!(resolve("chart for nzd/jpy please"), "NZDJPY");
        assert_eq!(resolve("signal PEPEUSDT"), "PEPEUSDT");
        let resolved = normalize("what is GBPCAD doing").unwrap();
        assert_eq!(resolved.matched_by, MatchKind::TickerPattern);
        assert_eq!(resolved.asset_class, AssetClass::ForexMetal);
    }

    #[test]
    fn test_bare_ticker_prefers_known_quote() {
        assert_eq!(resolve("SIGNAL FOR ARBUSDT"), "ARBUSDT");
    }

    #[test]
    fn test_asset_class_follows_symbol() {
        assert_eq!(normalize("bitcoin").unwrap().asset_class, AssetClass::Crypto);
        assert_eq!(normalize("gold").unwrap().asset_class, AssetClass::ForexMetal);
    }

    #[test]
    fn test_not_found() {
        let err = normalize("hello there").unwrap_err();
        assert_eq!(
            err,
            NormalizationError::SymbolNotFound {
                input: "hello there".to_string()
            }
        );
        assert!(normalize("").is_err());
    }

    #[test]
    fn test_display_form_is_idempotent() {
        for &target in aliases::ALIAS_TABLE.values() {
            let symbol = CanonicalSymbol::parse(target).unwrap();
            let direct = normalize(symbol.as_str()).unwrap().symbol;
            let via_display = normalize(&symbol.display_pair()).unwrap().symbol;
            assert_eq!(direct, via_display, "display form of {}", target);
        }
    }
}
