//! Run configuration, assembled from env (`.env` supported) with CLI
//! overrides. The similarity threshold and the borderline audit margin are
//! deliberately configuration rather than constants: the 0.8 default is a
//! hand-tuned heuristic, and borderline merges are logged for manual review
//! instead of silently trusted.

use std::path::PathBuf;

use crate::matching::DEFAULT_SIMILARITY_THRESHOLD;
use crate::util::env::{env_opt, env_parse};

/// Fuzzy merges scoring within this distance above the threshold are flagged
/// as borderline in the run report.
pub const DEFAULT_BORDERLINE_MARGIN: f64 = 0.05;

const DEFAULT_SNAPSHOT_DIR: &str = "data/snapshot";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum similarity for a fuzzy merge. Env: `SIMILARITY_THRESHOLD`.
    pub similarity_threshold: f64,
    /// Audit margin above the threshold. Env: `BORDERLINE_MARGIN`.
    pub borderline_margin: f64,
    /// Snapshot directory holding the three persisted collections.
    /// Env: `SNAPSHOT_DIR`.
    pub snapshot_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            borderline_margin: DEFAULT_BORDERLINE_MARGIN,
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self {
            similarity_threshold: env_parse("SIMILARITY_THRESHOLD", DEFAULT_SIMILARITY_THRESHOLD),
            borderline_margin: env_parse("BORDERLINE_MARGIN", DEFAULT_BORDERLINE_MARGIN),
            snapshot_dir: env_opt("SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_DIR)),
        }
    }

    /// Whether a fuzzy score should be flagged for human review.
    pub fn is_borderline(&self, score: f64) -> bool {
        score <= self.similarity_threshold + self.borderline_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_constants() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.similarity_threshold, 0.80);
        assert_eq!(cfg.borderline_margin, 0.05);
    }

    #[test]
    fn borderline_window_sits_just_above_threshold() {
        let cfg = PipelineConfig::default();
        assert!(cfg.is_borderline(0.80));
        assert!(cfg.is_borderline(0.84));
        assert!(!cfg.is_borderline(0.95));
    }
}
