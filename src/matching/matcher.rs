//! Match cascade for one incoming record against the canonical set.
//!
//! Order matters and the first hit wins: exact external-id duplicate, then
//! slug equality, then a state-scoped fuzzy scan. Cross-state fuzzy matching
//! is never attempted — same-named clubs in different states are different
//! clubs, and merging them would be a correctness bug, not a tuning problem.

use rayon::prelude::*;

use crate::consolidate::model::{CanonicalSet, ClubRecord};
use crate::matching::similarity::similarity;
use crate::normalization::normalize_name;

/// Outcome of matching one incoming record. Indexes point into the canonical
/// set's insertion order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchOutcome {
    /// The incoming external id already exists; the record is a pure duplicate.
    ExactIdDuplicate,
    /// The incoming base slug is already issued to an existing record.
    SlugMatch(usize),
    /// Best same-state fuzzy candidate at or above the threshold. `tied` is
    /// set when a second candidate reached the same maximum score (the first
    /// in insertion order wins, but the merge deserves human review).
    FuzzyMatch { index: usize, score: f64, tied: bool },
    NoMatch,
}

/// Find the best existing match for `incoming`, whose `slug` field holds its
/// derived base slug (allocation happens after a `NoMatch`).
pub fn find_match(incoming: &ClubRecord, canonical: &CanonicalSet, threshold: f64) -> MatchOutcome {
    if canonical.contains_external_id(&incoming.external_id) {
        return MatchOutcome::ExactIdDuplicate;
    }
    if let Some(idx) = canonical.index_of_slug(&incoming.slug) {
        return MatchOutcome::SlugMatch(idx);
    }

    let needle = normalize_name(&incoming.name);
    if needle.is_empty() {
        return MatchOutcome::NoMatch;
    }

    match best_candidate(&needle, &incoming.state_code, canonical) {
        Some(best) if best.score >= threshold => MatchOutcome::FuzzyMatch {
            index: best.index,
            score: best.score,
            tied: best.ties > 1,
        },
        _ => MatchOutcome::NoMatch,
    }
}

#[derive(Debug, Clone, Copy)]
struct Best {
    index: usize,
    score: f64,
    /// Number of candidates that reached `score`.
    ties: usize,
}

/// Read-only scoring scan over same-state candidates. Parallel, but the
/// reduction is order-insensitive (higher score wins, lower index breaks
/// exact ties), so the result is identical to a sequential left-to-right scan.
fn best_candidate(needle: &str, state_code: &str, canonical: &CanonicalSet) -> Option<Best> {
    let names = canonical.normalized_names();
    canonical
        .clubs()
        .par_iter()
        .enumerate()
        .filter(|(_, club)| club.state_code == state_code)
        .map(|(index, _)| Best {
            index,
            score: similarity(needle, &names[index]),
            ties: 1,
        })
        .reduce_with(|a, b| {
            if b.score > a.score {
                b
            } else if b.score < a.score {
                a
            } else {
                Best {
                    index: a.index.min(b.index),
                    score: a.score,
                    ties: a.ties + b.ties,
                }
            }
        })
}
