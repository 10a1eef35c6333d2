use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::consolidate::model::RawClubRecord;
use crate::sources::RecordSource;

/// A header-driven CSV export. Column names follow the raw-record shape
/// (`name`, `city`, `state`, `externalId`/`placeId`, enrichable fields);
/// unknown columns are ignored, absent ones deserialize as `None`.
pub struct CsvBatchSource {
    path: PathBuf,
    label: String,
}

impl CsvBatchSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, label }
    }
}

impl RecordSource for CsvBatchSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn load(&self) -> Result<Vec<RawClubRecord>> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("open source batch {}", self.path.display()))?;

        let mut out = Vec::new();
        for (i, row) in rdr.deserialize::<RawClubRecord>().enumerate() {
            let record =
                row.with_context(|| format!("{}: bad row {}", self.path.display(), i + 2))?;
            out.push(record);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_headered_csv() {
        let dir = std::env::temp_dir().join("mcd-csv-src-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("batch.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "externalId,name,city,state,phone").unwrap();
        writeln!(f, "p1,Iron Horsemen MC,Austin,TX,555-1234").unwrap();
        writeln!(f, "p2,Desert Eagles MC,Phoenix,Arizona,").unwrap();

        let batch = CsvBatchSource::new(&path).load().unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].phone.as_deref(), Some("555-1234"));
        assert_eq!(batch[1].state.as_deref(), Some("Arizona"));
        assert_eq!(batch[1].phone.as_deref().unwrap_or(""), "");
    }
}
