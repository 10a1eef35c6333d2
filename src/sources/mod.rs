//! Source batch adapters.
//!
//! Every producer (scraper export, CSV import, curated list) is reduced to one
//! interface yielding the common raw-record shape, so the matching and merge
//! logic exists exactly once in the orchestrator instead of once per source.

pub mod csv_batch;
pub mod json_batch;

use anyhow::Result;

use crate::consolidate::model::RawClubRecord;

/// One ingestion source producing a batch of raw records.
pub trait RecordSource {
    /// Short label used in logs and the run report (e.g. a file name).
    fn label(&self) -> &str;
    /// Read the whole batch. Called once, at the `Loaded` boundary.
    fn load(&self) -> Result<Vec<RawClubRecord>>;
}

pub use csv_batch::CsvBatchSource;
pub use json_batch::JsonBatchSource;
