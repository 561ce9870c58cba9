use super::text::normalize_text;
use crate::domain::market::Timeframe;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const EN_MINUTES: &str = r"(?:m|min|mins|minute|minutes)";
const EN_HOURS: &str = r"(?:h|hr|hrs|hour|hours)";
const AR_MINUTES: &str = r"دق(?:ايق|ائق|يقه)";
const AR_HOURS: &str = r"ساع(?:ات|ه)";

/// Bare unit words only count when the preceding word is not a number, so
/// `"5 minutes"` is never read as the one-minute bucket.
fn unquantified(words: &str) -> String {
    format!(r"(?:^|[^\d\s]\s+)(?:{})(?:\s|$)", words)
}

fn bucket_patterns(timeframe: Timeframe) -> Vec<String> {
    match timeframe {
        Timeframe::OneMin => vec![
            format!(r"\b1\s*{EN_MINUTES}\b"),
            r"\b(?:one|a|per|every)\s+minute\b".to_string(),
            r"\b(?:m1|minutely)\b".to_string(),
            format!(r"\b1\s*{AR_MINUTES}"),
            r"دقيقه\s+واحده".to_string(),
            unquantified("minute|min|دقيقه|الدقيقه|عالدقيقه|بالدقيقه|علي الدقيقه"),
        ],
        Timeframe::FiveMin => vec![
            format!(r"\b5\s*{EN_MINUTES}\b"),
            r"\bfive\s+min(?:ute)?s?\b".to_string(),
            r"\bm5\b".to_string(),
            format!(r"\b5\s*{AR_MINUTES}"),
            format!(r"خمس(?:ه)?\s*{AR_MINUTES}"),
        ],
        Timeframe::FifteenMin => vec![
            format!(r"\b15\s*{EN_MINUTES}\b"),
            r"\bfifteen\s+min(?:ute)?s?\b".to_string(),
            r"\b(?:m15|quarter)\b".to_string(),
            format!(r"\b15\s*{AR_MINUTES}"),
            r"ربع\s*(?:ال)?ساعه".to_string(),
            format!(r"خمس(?:ه)?\s*عشر(?:ه)?\s*{AR_MINUTES}"),
        ],
        Timeframe::ThirtyMin => vec![
            format!(r"\b30\s*{EN_MINUTES}\b"),
            r"\bthirty\s+min(?:ute)?s?\b".to_string(),
            r"\bm30\b".to_string(),
            r"\bhalf\s*(?:an\s+)?hour(?:ly)?\b".to_string(),
            format!(r"\b30\s*{AR_MINUTES}"),
            r"نص(?:ف)?\s*(?:ال)?ساعه".to_string(),
            format!(r"ثلاثين\s*{AR_MINUTES}"),
        ],
        Timeframe::OneHour => vec![
            format!(r"\b1\s*{EN_HOURS}\b"),
            r"\b(?:one|an|per|every)\s+hour\b".to_string(),
            r"\b(?:h1|hourly)\b".to_string(),
            format!(r"\b60\s*{EN_MINUTES}\b"),
            r"\b1\s*ساعه".to_string(),
            r"ساعه\s+واحده".to_string(),
            unquantified("hour|ساعه|الساعه|عالساعه|بالساعه|علي الساعه|ساعي|الساعي"),
        ],
        Timeframe::FourHour => vec![
            format!(r"\b4\s*{EN_HOURS}\b"),
            r"\bfour\s+hours?\b".to_string(),
            r"\bh4\b".to_string(),
            r"\b240\s*(?:m|min)\b".to_string(),
            format!(r"\b4\s*{AR_HOURS}"),
            format!(r"اربع(?:ه)?\s*{AR_HOURS}"),
        ],
        Timeframe::OneDay => vec![
            r"\b1\s*(?:d|day)\b".to_string(),
            r"\b(?:d1|one\s+day|per\s+day|every\s+day)\b".to_string(),
            format!(r"\b24\s*(?:{EN_HOURS}|ساعه)"),
            unquantified("day|daily|يوم|يومي|اليومي|عاليومي|باليوم|ديلي|يوميا"),
        ],
    }
}

/// Buckets in priority order: the first bucket with any match wins.
static BUCKETS: LazyLock<Vec<(Timeframe, Vec<Regex>)>> = LazyLock::new(|| {
    Timeframe::all()
        .into_iter()
        .map(|tf| {
            let patterns = bucket_patterns(tf)
                .iter()
                .map(|p| Regex::new(p).expect("timeframe pattern is valid"))
                .collect();
            (tf, patterns)
        })
        .collect()
});

/// Timeframe named in `raw`, if any.
pub fn detect_timeframe(raw: &str) -> Option<Timeframe> {
    let normalized = normalize_text(raw);
    if normalized.is_empty() {
        return None;
    }

    BUCKETS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(&normalized)))
        .map(|(tf, _)| *tf)
}

/// Timeframe named in `raw`, or `fallback` when nothing matches.
pub fn resolve_timeframe(raw: &str, fallback: Timeframe) -> Timeframe {
    match detect_timeframe(raw) {
        Some(tf) => {
            debug!("TimeframeResolver: '{}' -> {}", raw, tf);
            tf
        }
        None => fallback,
    }
}
