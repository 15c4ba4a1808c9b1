//! Approximate matching of a normalized query against the catalog.

use crate::catalog::SymbolCatalog;
use crate::models::SymbolRecord;
use crate::normalize::similarity;

/// Minimum similarity for a catalog key to count as a match.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.65;

/// A single fuzzy match above this similarity is accepted outright.
pub const CONFIDENT_MATCH_THRESHOLD: f64 = 0.85;

/// Scan every catalog entry and keep those with `similarity >= threshold`.
///
/// Each returned record carries its similarity as confidence. Results are
/// sorted best first; equal scores keep catalog order.
pub fn find_matches(catalog: &SymbolCatalog, key: &str, threshold: f64) -> Vec<SymbolRecord> {
    let mut matches: Vec<SymbolRecord> = catalog
        .entries()
        .into_iter()
        .filter_map(|(catalog_key, record)| {
            let score = similarity(key, &catalog_key);
            (score >= threshold).then(|| record.with_confidence(score))
        })
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SymbolCatalog {
        let catalog = SymbolCatalog::empty();
        catalog.add("Acme", "ACME", "NYSE", 0.95).unwrap();
        catalog.add("Acme Corp", "ACME", "NYSE", 0.95).unwrap();
        catalog.add("Acne", "ACNE", "NASDAQ", 0.90).unwrap();
        catalog.add("Globex", "GBX", "NYSE", 0.95).unwrap();
        catalog
    }

    #[test]
    fn test_exact_key_scores_one() {
        let matches = find_matches(&catalog(), "globex", DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].ticker, "GBX");
        assert_eq!(matches[0].confidence, 1.0);
    }

    #[test]
    fn test_sorted_descending_ties_in_catalog_order() {
        // "acxe" is one edit from both "acme" and "acne"
        let matches = find_matches(&catalog(), "acxe", DEFAULT_FUZZY_THRESHOLD);
        let tickers: Vec<&str> = matches.iter().map(|m| m.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["ACME", "ACNE"]);
        assert_eq!(matches[0].confidence, 0.75);
        assert_eq!(matches[1].confidence, 0.75);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let catalog = SymbolCatalog::empty();
        catalog.add("aaaaaaaaaaaaaaaaaaaa", "AAAA", "NYSE", 0.9).unwrap();

        // 7 edits over 20 chars is exactly 0.65
        let matches = find_matches(&catalog, "aaaaaaaaaaaaabbbbbbb", DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_just_below_threshold_is_excluded() {
        let catalog = SymbolCatalog::empty();
        let name = "a".repeat(37);
        catalog.add(&name, "AAAA", "NYSE", 0.9).unwrap();

        // 13 edits over 37 chars is about 0.6486
        let key = format!("{}{}", "a".repeat(24), "b".repeat(13));
        assert!(find_matches(&catalog, &key, DEFAULT_FUZZY_THRESHOLD).is_empty());
    }

    #[test]
    fn test_one_match_per_catalog_entry() {
        // both ACME keys match, and each is reported separately
        let matches = find_matches(&catalog(), "acmecorp", 0.3);
        let tickers: Vec<&str> = matches.iter().map(|m| m.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["ACME", "ACME", "ACNE"]);
        assert_eq!(matches[0].confidence, 1.0);
        assert_eq!(matches[1].confidence, 0.5);
    }

    #[test]
    fn test_empty_catalog_has_no_matches() {
        assert!(find_matches(&SymbolCatalog::empty(), "acme", 0.0).is_empty());
    }
}
