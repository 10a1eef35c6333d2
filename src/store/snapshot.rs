//! File-backed snapshot of the three persisted collections.
//!
//! Persisting is write-new-then-swap: every collection is fully serialized to
//! a sibling `*.json.tmp` first, and the renames over the live files happen
//! only after all writes succeeded. A failure anywhere before the first
//! rename leaves the previous snapshot authoritative.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::consolidate::model::{CityAggregate, ClubRecord, StateAggregate};
use crate::consolidate::report::RunReport;

const CLUBS_FILE: &str = "clubs.json";
const STATES_FILE: &str = "states.json";
const CITIES_FILE: &str = "cities.json";

/// The full persisted state between runs.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub clubs: Vec<ClubRecord>,
    pub states: Vec<StateAggregate>,
    pub cities: Vec<CityAggregate>,
}

/// Directory-backed store for [`Snapshot`]s and run reports.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the previous snapshot. A missing directory or missing files load
    /// as empty collections (first run); unreadable files are fatal.
    pub fn load(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            clubs: self.read_collection(CLUBS_FILE)?,
            states: self.read_collection(STATES_FILE)?,
            cities: self.read_collection(CITIES_FILE)?,
        })
    }

    /// Atomically replace the previous snapshot with `snapshot`.
    pub fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create snapshot dir {}", self.dir.display()))?;

        // Stage everything before touching the live files.
        let staged = [
            self.write_tmp(CLUBS_FILE, &snapshot.clubs)?,
            self.write_tmp(STATES_FILE, &snapshot.states)?,
            self.write_tmp(CITIES_FILE, &snapshot.cities)?,
        ];
        for (tmp, live) in &staged {
            fs::rename(tmp, live)
                .with_context(|| format!("swap snapshot file {}", live.display()))?;
        }
        Ok(())
    }

    /// Write the run report under `reports/run-<timestamp>.json` and return
    /// its path.
    pub fn write_report(&self, report: &RunReport) -> Result<PathBuf> {
        let reports_dir = self.dir.join("reports");
        fs::create_dir_all(&reports_dir)
            .with_context(|| format!("create reports dir {}", reports_dir.display()))?;
        let name = format!("run-{}.json", report.started_at.format("%Y%m%dT%H%M%S%fZ"));
        let path = reports_dir.join(name);
        let file = File::create(&path)
            .with_context(|| format!("create report {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), report)
            .with_context(|| format!("write report {}", path.display()))?;
        Ok(path)
    }

    fn read_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let path = self.dir.join(name);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("open snapshot file {}", path.display()))
            }
        };
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parse snapshot file {}", path.display()))
    }

    fn write_tmp<T: Serialize>(&self, name: &str, value: &T) -> Result<(PathBuf, PathBuf)> {
        let live = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        let file =
            File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)
            .with_context(|| format!("serialize {}", tmp.display()))?;
        writer
            .flush()
            .with_context(|| format!("flush {}", tmp.display()))?;
        Ok((tmp, live))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::model::test_club;

    fn temp_store(tag: &str) -> SnapshotStore {
        let dir = std::env::temp_dir().join(format!("mcd-snapshot-{tag}"));
        let _ = fs::remove_dir_all(&dir);
        SnapshotStore::new(dir)
    }

    #[test]
    fn missing_snapshot_loads_empty() {
        let store = temp_store("empty");
        let snap = store.load().unwrap();
        assert!(snap.clubs.is_empty());
        assert!(snap.states.is_empty());
        assert!(snap.cities.is_empty());
    }

    #[test]
    fn persist_then_load_round_trips() {
        let store = temp_store("roundtrip");
        let snap = Snapshot {
            clubs: vec![test_club(
                "x1",
                "iron-horsemen-austin-tx",
                "Iron Horsemen MC",
                ("tx", "Texas"),
                "austin",
            )],
            states: vec![StateAggregate {
                code: "tx".into(),
                name: "Texas".into(),
                club_count: 1,
                city_count: 1,
            }],
            cities: vec![CityAggregate {
                name: "austin".into(),
                slug: "austin".into(),
                state_code: "tx".into(),
                state_name: "Texas".into(),
                club_count: 1,
            }],
        };
        store.persist(&snap).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.clubs, snap.clubs);
        assert_eq!(loaded.states, snap.states);
        assert_eq!(loaded.cities, snap.cities);

        // No stray staging files after the swap.
        let leftovers: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn persist_overwrites_previous_snapshot_whole() {
        let store = temp_store("overwrite");
        let first = Snapshot {
            clubs: vec![
                test_club("x1", "a-tx", "A", ("tx", "Texas"), "austin"),
                test_club("x2", "b-tx", "B", ("tx", "Texas"), "waco"),
            ],
            ..Default::default()
        };
        store.persist(&first).unwrap();

        let second = Snapshot {
            clubs: vec![test_club("x3", "c-ca", "C", ("ca", "California"), "fresno")],
            ..Default::default()
        };
        store.persist(&second).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.clubs.len(), 1);
        assert_eq!(loaded.clubs[0].external_id, "x3");
    }
}
