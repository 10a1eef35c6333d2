use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::consolidate::model::RawClubRecord;
use crate::sources::RecordSource;

/// A JSON array of raw records, as exported by the scrapers.
pub struct JsonBatchSource {
    path: PathBuf,
    label: String,
}

impl JsonBatchSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, label }
    }
}

impl RecordSource for JsonBatchSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn load(&self) -> Result<Vec<RawClubRecord>> {
        let file = File::open(&self.path)
            .with_context(|| format!("open source batch {}", self.path.display()))?;
        let records: Vec<RawClubRecord> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parse source batch {}", self.path.display()))?;
        Ok(records)
    }
}
