use strsim::levenshtein;

/// Minimum similarity score required for two normalized club names to be
/// treated as the same club. Overridable through `SIMILARITY_THRESHOLD`.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.80;

/// Bounded [0, 1] similarity between two pre-normalized names.
///
/// Exact equality short-circuits to 1.0; otherwise the score is
/// `1 - levenshtein(a, b) / max(|a|, |b|)`. Two empty strings score 0.0 —
/// an empty name carries no matching signal and must never merge records.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein(a, b);
    1.0 - distance as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::normalize_name;

    #[test]
    fn identical_names_score_one() {
        assert_eq!(similarity("iron horsemen", "iron horsemen"), 1.0);
    }

    #[test]
    fn both_empty_scores_zero() {
        assert_eq!(similarity("", ""), 0.0);
    }

    #[test]
    fn one_empty_scores_zero() {
        assert_eq!(similarity("iron horsemen", ""), 0.0);
    }

    #[test]
    fn score_is_normalized_edit_distance() {
        // "abcd" -> "abce": 1 edit over max length 4.
        assert_eq!(similarity("abcd", "abce"), 0.75);
    }

    #[test]
    fn suffix_variants_clear_the_threshold() {
        let a = normalize_name("Iron Horsemen MC");
        let b = normalize_name("Iron Horsemen Motorcycle Club");
        assert!(similarity(&a, &b) >= DEFAULT_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn unrelated_names_stay_below_threshold() {
        let a = normalize_name("Iron Horsemen MC");
        let b = normalize_name("Desert Eagles MC");
        assert!(similarity(&a, &b) < DEFAULT_SIMILARITY_THRESHOLD);
    }
}
