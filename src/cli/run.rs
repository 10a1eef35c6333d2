//! `mcd run` — one consolidation run over a single source batch.

use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::info;

use crate::config::PipelineConfig;
use crate::consolidate::orchestrator::run_pipeline;
use crate::consolidate::report::RunReport;
use crate::sources::{CsvBatchSource, JsonBatchSource, RecordSource};
use crate::store::SnapshotStore;
use crate::util::env as env_util;

/// Source batch encoding. Inferred from the file extension when not forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Path to the source batch file.
    pub source: PathBuf,
    /// Force the batch format instead of inferring it from the extension.
    pub format: Option<SourceFormat>,
    /// Override SNAPSHOT_DIR.
    pub snapshot_dir: Option<PathBuf>,
    /// Override SIMILARITY_THRESHOLD.
    pub threshold: Option<f64>,
    /// Compute and report everything, persist nothing.
    pub dry_run: bool,
}

pub fn run(cfg: RunConfig) -> Result<RunReport> {
    env_util::init_env();

    let mut pipeline_cfg = PipelineConfig::from_env();
    if let Some(dir) = &cfg.snapshot_dir {
        pipeline_cfg.snapshot_dir = dir.clone();
    }
    if let Some(t) = cfg.threshold {
        if !(0.0..=1.0).contains(&t) {
            bail!("similarity threshold must be within [0, 1], got {t}");
        }
        pipeline_cfg.similarity_threshold = t;
    }

    let source = make_source(&cfg)?;
    let store = SnapshotStore::new(&pipeline_cfg.snapshot_dir);
    info!(
        source = source.label(),
        snapshot_dir = %pipeline_cfg.snapshot_dir.display(),
        threshold = pipeline_cfg.similarity_threshold,
        dry_run = cfg.dry_run,
        "starting consolidation run"
    );

    run_pipeline(&pipeline_cfg, source.as_ref(), &store, cfg.dry_run)
}

fn make_source(cfg: &RunConfig) -> Result<Box<dyn RecordSource>> {
    let format = match cfg.format {
        Some(f) => f,
        None => match cfg.source.extension().and_then(|e| e.to_str()) {
            Some("json") => SourceFormat::Json,
            Some("csv") => SourceFormat::Csv,
            other => bail!(
                "cannot infer batch format from extension {:?}; pass --format",
                other
            ),
        },
    };
    Ok(match format {
        SourceFormat::Json => Box::new(JsonBatchSource::new(&cfg.source)),
        SourceFormat::Csv => Box::new(CsvBatchSource::new(&cfg.source)),
    })
}
