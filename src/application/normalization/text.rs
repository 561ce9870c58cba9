//! Text canonicalization shared by the symbol normalizer and the timeframe
//! resolver. Alias keys and regex patterns are written against this form.

/// Clitic prefixes stripped by [`destem`], longest first.
const CLITIC_PREFIXES: &[&str] = &[
    "وبال", "وال", "بال", "فال", "كال", "عال", "لل", "ال", "و", "ب", "ل", "ك", "ف",
];

/// Arabic-Indic and Extended Arabic-Indic digits to ASCII.
pub fn ascii_digit(c: char) -> Option<char> {
    match c {
        '\u{0660}'..='\u{0669}' => char::from_digit(c as u32 - 0x0660, 10),
        '\u{06F0}'..='\u{06F9}' => char::from_digit(c as u32 - 0x06F0, 10),
        _ => None,
    }
}

fn is_decoration(c: char) -> bool {
    // Harakat, superscript alef and tatweel
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{0640}')
}

fn fold_letter(c: char) -> char {
    match c {
        'أ' | 'إ' | 'آ' | 'ٱ' => 'ا',
        'ى' => 'ي',
        'ة' => 'ه',
        _ => c,
    }
}

/// Digits to ASCII and Arabic decorations removed; case and punctuation kept.
pub fn fold_digits(raw: &str) -> String {
    raw.chars()
        .filter(|c| !is_decoration(*c))
        .map(|c| ascii_digit(c).unwrap_or(c))
        .collect()
}

/// Lower-cased, whitespace-collapsed form with Arabic diacritics stripped,
/// letter variants folded and punctuation (except `/`) turned into spaces.
pub fn normalize_text(raw: &str) -> String {
    let mapped: String = fold_digits(raw)
        .chars()
        .map(fold_letter)
        .map(|c| {
            if c.is_alphanumeric() || c == '/' {
                c
            } else {
                ' '
            }
        })
        .flat_map(char::to_lowercase)
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips one leading Arabic clitic (article, conjunction, single-letter
/// preposition) when at least two letters remain.
pub fn destem(token: &str) -> &str {
    for prefix in CLITIC_PREFIXES {
        if let Some(rest) = token.strip_prefix(prefix)
            && rest.chars().count() >= 2
        {
            return rest;
        }
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_diacritics_and_tatweel() {
        assert_eq!(normalize_text("ذَهَب"), "ذهب");
        assert_eq!(normalize_text("ذهــــب"), "ذهب");
    }

    #[test]
    fn test_folds_letter_variants() {
        assert_eq!(normalize_text("إيثريوم"), "ايثريوم");
        assert_eq!(normalize_text("فضة"), "فضه");
    }

    #[test]
    fn test_arabic_indic_digits() {
        assert_eq!(normalize_text("٤ ساعات"), "4 ساعات");
        assert_eq!(normalize_text("۱۵ دقيقة"), "15 دقيقه");
    }

    #[test]
    fn test_collapses_whitespace_and_punctuation() {
        assert_eq!(normalize_text("  Price   of GOLD?? "), "price of gold");
        assert_eq!(normalize_text("سعر، الذهب؟"), "سعر الذهب");
        assert_eq!(normalize_text("XAU/USD"), "xau/usd");
    }

    #[test]
    fn test_destem() {
        assert_eq!(destem("الذهب"), "ذهب");
        assert_eq!(destem("بالذهب"), "ذهب");
        assert_eq!(destem("وبالفضه"), "فضه");
        assert_eq!(destem("عالساعه"), "ساعه");
        // Too short to strip
        assert_eq!(destem("بن"), "بن");
        assert_eq!(destem("gold"), "gold");
    }
}
