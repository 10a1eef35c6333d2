//! Machine-readable run report: outcome counters, per-record skip reasons,
//! and an audit trail of every fuzzy merge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a record was excluded from the canonical set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    DuplicateId,
    UnrecognizedState,
    MissingField,
    /// Matched an existing record but had nothing new to contribute.
    Unchanged,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::DuplicateId => "duplicate id",
            SkipReason::UnrecognizedState => "unrecognized state",
            SkipReason::MissingField => "missing required field",
            SkipReason::Unchanged => "unchanged, skipped",
        };
        f.write_str(s)
    }
}

/// One skipped input record, by display name (or a placeholder when the name
/// itself was the missing field).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRecord {
    pub name: String,
    pub reason: SkipReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// One fuzzy merge, kept for manual audit of threshold correctness.
/// `borderline` marks the highest-risk merges: a tie at the maximum score, or
/// a score within the configured margin of the threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuzzyMerge {
    pub incoming_name: String,
    pub matched_name: String,
    pub score: f64,
    pub borderline: bool,
}

/// Summary of one consolidation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_input: usize,
    pub added: usize,
    pub enriched: usize,
    pub unchanged_skipped: usize,
    pub duplicate_id_skipped: usize,
    pub unrecognized_state_skipped: usize,
    pub missing_field_skipped: usize,
    pub fuzzy_merges: Vec<FuzzyMerge>,
    pub skips: Vec<SkippedRecord>,
}

impl RunReport {
    pub fn new(source: &str) -> Self {
        let now = Utc::now();
        Self {
            source: source.to_string(),
            started_at: now,
            finished_at: now,
            total_input: 0,
            added: 0,
            enriched: 0,
            unchanged_skipped: 0,
            duplicate_id_skipped: 0,
            unrecognized_state_skipped: 0,
            missing_field_skipped: 0,
            fuzzy_merges: Vec::new(),
            skips: Vec::new(),
        }
    }

    /// Record a skip under its counter and in the per-record list.
    pub fn record_skip(&mut self, name: &str, reason: SkipReason, detail: Option<String>) {
        match reason {
            SkipReason::DuplicateId => self.duplicate_id_skipped += 1,
            SkipReason::UnrecognizedState => self.unrecognized_state_skipped += 1,
            SkipReason::MissingField => self.missing_field_skipped += 1,
            SkipReason::Unchanged => self.unchanged_skipped += 1,
        }
        self.skips.push(SkippedRecord {
            name: name.to_string(),
            reason,
            detail,
        });
    }

    pub fn record_fuzzy_merge(
        &mut self,
        incoming_name: &str,
        matched_name: &str,
        score: f64,
        borderline: bool,
    ) {
        self.fuzzy_merges.push(FuzzyMerge {
            incoming_name: incoming_name.to_string(),
            matched_name: matched_name.to_string(),
            score,
            borderline,
        });
    }

    /// Records that made it into the canonical set or changed one.
    pub fn applied(&self) -> usize {
        self.added + self.enriched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_skip_reasons() {
        let mut report = RunReport::new("test");
        report.record_skip("A", SkipReason::DuplicateId, None);
        report.record_skip("B", SkipReason::UnrecognizedState, Some("Texaz".into()));
        report.record_skip("C", SkipReason::Unchanged, None);
        assert_eq!(report.duplicate_id_skipped, 1);
        assert_eq!(report.unrecognized_state_skipped, 1);
        assert_eq!(report.unchanged_skipped, 1);
        assert_eq!(report.skips.len(), 3);
    }

    #[test]
    fn report_serializes_with_camel_case_field_names() {
        let mut report = RunReport::new("test");
        report.total_input = 2;
        report.added = 1;
        report.record_fuzzy_merge("a", "b", 0.85, false);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalInput"], 2);
        assert_eq!(json["added"], 1);
        assert_eq!(json["fuzzyMerges"][0]["incomingName"], "a");
        assert_eq!(json["fuzzyMerges"][0]["matchedName"], "b");
    }
}
