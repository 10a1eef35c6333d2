//! `mcd counts` — print row counts for the persisted snapshot.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::store::SnapshotStore;
use crate::util::env as env_util;

#[derive(Debug, Clone, Default)]
pub struct CountsConfig {
    /// Optional override for the snapshot directory.
    pub snapshot_dir: Option<PathBuf>,
    /// Also print a per-state breakdown.
    pub per_state: bool,
}

pub fn run(cfg: CountsConfig) -> Result<()> {
    env_util::init_env();
    let dir = cfg
        .snapshot_dir
        .unwrap_or_else(|| PipelineConfig::from_env().snapshot_dir);
    let snapshot = SnapshotStore::new(&dir).load()?;

    println!("snapshot: {}", dir.display());
    println!("clubs:  {}", snapshot.clubs.len());
    println!("states: {}", snapshot.states.len());
    println!("cities: {}", snapshot.cities.len());

    if cfg.per_state {
        println!();
        println!("{:<6} {:<24} {:>6} {:>7}", "code", "state", "clubs", "cities");
        for state in &snapshot.states {
            println!(
                "{:<6} {:<24} {:>6} {:>7}",
                state.code, state.name, state.club_count, state.city_count
            );
        }
    }
    Ok(())
}
