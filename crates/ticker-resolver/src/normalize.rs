//! Pure string transforms used to build lookup keys and compare names.
//!
//! Everything here is side-effect free. The catalog, cache and fuzzy matcher
//! all key on the output of [`normalize`], so two raw inputs with the same
//! normalized form always resolve the same way.

use lazy_static::lazy_static;
use regex::Regex;

/// Punctuation removed by [`normalize`].
pub const STRIPPED_PUNCTUATION: &[char] = &['.', ',', '&', '\'', '"', '-', '(', ')'];

lazy_static! {
    /// 1-5 letters, optionally followed by a dot and a 1-2 letter class suffix.
    static ref TICKER_PATTERN: Regex = Regex::new(r"^[A-Z]{1,5}(\.[A-Z]{1,2})?$").expect("ticker pattern must compile");
}

/// Normalize a raw company name or query into a lookup key.
///
/// Trims, lowercases, strips [`STRIPPED_PUNCTUATION`], collapses whitespace
/// runs and finally removes whitespace altogether:
///
/// ```
/// use tickerlens_resolver::normalize::normalize;
///
/// assert_eq!(normalize("  Nvidia, Inc. "), "nvidiainc");
/// assert_eq!(normalize("AT&T"), "att");
/// ```
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect();

    // collapsing runs and then dropping the separators is one step
    stripped.split_whitespace().collect()
}

/// Levenshtein distance between `a` and `b` over Unicode scalar values.
///
/// Unit cost for insertion, deletion and substitution.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitution = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            table[i][j] = (table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1)
                .min(table[i - 1][j - 1] + substitution);
        }
    }

    table[a.len()][b.len()]
}

/// Similarity in `[0, 1]` derived from [`edit_distance`].
///
/// Two empty strings are identical, so they score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / longest as f64
}

/// Whether `s`, once uppercased, looks like an exchange ticker.
pub fn is_ticker_shaped(s: &str) -> bool {
    TICKER_PATTERN.is_match(&s.to_ascii_uppercase())
}

/// The ticker a raw query spells out, if any.
///
/// Whitespace is removed before the shape check so spaced-out input such as
/// `"N V D A"` is recognised, while the class-share dot in `"brk.b"` is kept.
pub fn ticker_candidate(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if is_ticker_shaped(&compact) {
        Some(compact.to_ascii_uppercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_whitespace() {
        assert_eq!(normalize("Nvidia, Inc."), "nvidiainc");
        assert_eq!(normalize("  Johnson & Johnson "), "johnsonjohnson");
        assert_eq!(normalize("Berkshire-Hathaway (Class B)"), "berkshirehathawayclassb");
        assert_eq!(normalize("\"McDonald's\"  Corp"), "mcdonaldscorp");
        assert_eq!(normalize("N V D A"), "nvda");
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t "), "");
        assert_eq!(normalize(".,&"), "");
    }

    #[test]
    fn test_normalize_is_stable_on_its_output() {
        let once = normalize("The Coca-Cola Company");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_edit_distance_classic_cases() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("nvidia", "nvidia"), 0);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
    }

    #[test]
    fn test_edit_distance_is_symmetric() {
        assert_eq!(
            edit_distance("microsoft", "microsfot"),
            edit_distance("microsfot", "microsoft")
        );
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("apple", "apple"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", "abc"), 0.0);
    }

    #[test]
    fn test_similarity_value() {
        // one substitution over ten characters
        assert!((similarity("abcdefghij", "abcdefghiX") - 0.9).abs() < 1e-12);
        // seven edits over twenty characters is exactly the fuzzy bar
        assert_eq!(
            similarity("aaaaaaaaaaaaaaaaaaaa", "aaaaaaaaaaaaabbbbbbb"),
            0.65
        );
    }

    #[test]
    fn test_is_ticker_shaped() {
        assert!(is_ticker_shaped("NVDA"));
        assert!(is_ticker_shaped("nvda"));
        assert!(is_ticker_shaped("F"));
        assert!(is_ticker_shaped("BRK.B"));
        assert!(is_ticker_shaped("rds.ab"));
        assert!(!is_ticker_shaped(""));
        assert!(!is_ticker_shaped("NVIDIA"));
        assert!(!is_ticker_shaped("BRK.ABC"));
        assert!(!is_ticker_shaped("BRK-B"));
        assert!(!is_ticker_shaped("AB12"));
        assert!(!is_ticker_shaped("N V D A"));
    }

    #[test]
    fn test_ticker_candidate() {
        assert_eq!(ticker_candidate("NVDA"), Some("NVDA".to_string()));
        assert_eq!(ticker_candidate(" N V D A "), Some("NVDA".to_string()));
        assert_eq!(ticker_candidate("brk.b"), Some("BRK.B".to_string()));
        assert_eq!(ticker_candidate("Nvidia, Inc."), None);
        assert_eq!(ticker_candidate("UNKNOWNCOMPANYXYZ123"), None);
    }

    #[test]
    fn test_non_ascii_letters_are_not_tickers() {
        // "ß" uppercases to "SS" under Unicode rules
        assert!(!is_ticker_shaped("ßa"));
        assert_eq!(ticker_candidate("ßa"), None);
        assert_eq!(ticker_candidate("ﬁ"), None);
    }
}
