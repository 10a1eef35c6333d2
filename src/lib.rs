//! Multi-source directory consolidation for motorcycle-club records.
//!
//! Batches harvested by heterogeneous sources (scrapers, CSV imports, curated
//! lists) are reconciled against one canonical club set: exact-id and slug
//! duplicates are detected, near-duplicates are fuzzy-matched per state and
//! enriched field-by-field without clobbering trusted data, new records get
//! unique URL-safe slugs, and the per-state / per-city rollups are rebuilt
//! from scratch after every run.

pub mod cli;
pub mod config;
pub mod consolidate;
pub mod matching;
pub mod normalization;
pub mod sources;
pub mod store;
pub mod tracing;

pub mod util {
    pub mod env;
}

// Re-export the main types for convenience.
pub use config::PipelineConfig;
pub use consolidate::model::{
    CanonicalSet, CityAggregate, ClubRecord, ClubStatus, RawClubRecord, StateAggregate,
};
pub use consolidate::orchestrator::{consolidate_batch, run_pipeline, ConsolidationOutcome, RunStage};
pub use consolidate::report::{FuzzyMerge, RunReport, SkipReason};
pub use consolidate::slug::{slugify, SlugAllocator};
pub use matching::{find_match, similarity, MatchOutcome, DEFAULT_SIMILARITY_THRESHOLD};
pub use sources::{CsvBatchSource, JsonBatchSource, RecordSource};
pub use store::{Snapshot, SnapshotStore};
