//! One consolidation run, end to end.
//!
//! The stage machine is `Loaded -> Validated -> Matched -> Merged ->
//! Recomputed -> Persisted -> Reported`; no stage is skipped. All I/O happens
//! at the `Loaded` and `Persisted`/`Reported` edges ([`run_pipeline`]); the
//! matching and merging core ([`consolidate_batch`]) is pure in-memory
//! computation over a batch plus the prior snapshot, which makes it directly
//! unit-testable. A failure before the persist swap leaves the previous
//! snapshot authoritative.

use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::consolidate::aggregates::recompute;
use crate::consolidate::enrich::enrich;
use crate::consolidate::model::{
    CanonicalSet, CityAggregate, ClubRecord, ClubStatus, RawClubRecord, StateAggregate,
};
use crate::consolidate::report::{RunReport, SkipReason};
use crate::consolidate::slug::{slugify, SlugAllocator};
use crate::matching::{find_match, MatchOutcome};
use crate::normalization::{normalize_city, normalize_state};
use crate::sources::RecordSource;
use crate::store::{Snapshot, SnapshotStore};

/// Stages of one run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunStage {
    Loaded,
    Validated,
    Matched,
    Merged,
    Recomputed,
    Persisted,
    Reported,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStage::Loaded => "loaded",
            RunStage::Validated => "validated",
            RunStage::Matched => "matched",
            RunStage::Merged => "merged",
            RunStage::Recomputed => "recomputed",
            RunStage::Persisted => "persisted",
            RunStage::Reported => "reported",
        };
        f.write_str(s)
    }
}

/// Result of the pure consolidation core: the next snapshot plus the report.
#[derive(Debug)]
pub struct ConsolidationOutcome {
    pub clubs: Vec<ClubRecord>,
    pub states: Vec<StateAggregate>,
    pub cities: Vec<CityAggregate>,
    pub report: RunReport,
}

impl ConsolidationOutcome {
    pub fn into_snapshot(self) -> (Snapshot, RunReport) {
        (
            Snapshot {
                clubs: self.clubs,
                states: self.states,
                cities: self.cities,
            },
            self.report,
        )
    }
}

/// Consolidate one source batch against the prior snapshot. Pure: no I/O.
pub fn consolidate_batch(
    prior: Snapshot,
    batch: Vec<RawClubRecord>,
    cfg: &PipelineConfig,
    source_label: &str,
) -> Result<ConsolidationOutcome> {
    let mut report = RunReport::new(source_label);
    report.total_input = batch.len();

    // Fail-closed: a prior snapshot violating the uniqueness invariants
    // aborts before any mutation.
    let mut canonical = CanonicalSet::from_clubs(prior.clubs).context("prior snapshot invalid")?;
    debug!(stage = %RunStage::Loaded, canonical = canonical.len(), input = report.total_input, "canonical set ready");

    // Validated: reject incomplete records before matching begins. Each
    // survivor is a fully shaped canonical candidate whose `slug` field holds
    // the derived base slug; final allocation happens only after a `NoMatch`.
    let mut prepared: Vec<ClubRecord> = Vec::with_capacity(batch.len());
    for raw in &batch {
        if let Some(record) = validate(raw, &mut report) {
            prepared.push(record);
        }
    }
    debug!(stage = %RunStage::Validated, accepted = prepared.len(), rejected = report.skips.len(), "batch validated");

    // Matched + Merged, one pass in batch order. The allocator and the
    // seen-id set are run-local; nothing is re-read from storage mid-run.
    let mut allocator = SlugAllocator::with_reserved(canonical.slugs().map(str::to_string));
    let mut seen_ids: HashSet<String> = HashSet::new();
    debug!(stage = %RunStage::Matched, candidates = prepared.len(), "matching against canonical set");

    for incoming in prepared {
        // A second occurrence of the same external id inside this batch is a
        // pure duplicate even when the first occurrence enriched an existing
        // record instead of being appended.
        if !seen_ids.insert(incoming.external_id.clone()) {
            report.record_skip(&incoming.name, SkipReason::DuplicateId, None);
            continue;
        }

        match find_match(&incoming, &canonical, cfg.similarity_threshold) {
            MatchOutcome::ExactIdDuplicate => {
                report.record_skip(&incoming.name, SkipReason::DuplicateId, None);
            }
            MatchOutcome::SlugMatch(idx) => {
                merge_into(&mut canonical, idx, &incoming, &mut report);
            }
            MatchOutcome::FuzzyMatch { index, score, tied } => {
                let matched_name = canonical
                    .get(index)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                let borderline = tied || cfg.is_borderline(score);
                if borderline {
                    warn!(
                        incoming = %incoming.name,
                        matched = %matched_name,
                        score,
                        tied,
                        "borderline fuzzy merge; review recommended"
                    );
                }
                report.record_fuzzy_merge(&incoming.name, &matched_name, score, borderline);
                merge_into(&mut canonical, index, &incoming, &mut report);
            }
            MatchOutcome::NoMatch => {
                let mut record = incoming;
                record.slug = allocator.allocate(&record.slug);
                // Slug reservation and the append commit together; the set
                // rejects the record outright if either uniqueness index is
                // violated.
                canonical.push(record).context("append new canonical record")?;
                report.added += 1;
            }
        }
    }
    debug!(stage = %RunStage::Merged, added = report.added, enriched = report.enriched, "batch merged");

    // Recomputed: exactly once per run, over the whole set.
    let (states, cities) = recompute(canonical.clubs(), &prior.states, &prior.cities);
    debug!(stage = %RunStage::Recomputed, states = states.len(), cities = cities.len(), "aggregates rebuilt");

    report.finished_at = Utc::now();
    Ok(ConsolidationOutcome {
        clubs: canonical.into_clubs(),
        states,
        cities,
        report,
    })
}

/// Drive a full run: load snapshot, consolidate, persist atomically, write
/// the report. With `dry_run` the persist/report stages are logged but not
/// executed, and the previous snapshot stays untouched.
pub fn run_pipeline(
    cfg: &PipelineConfig,
    source: &dyn RecordSource,
    store: &SnapshotStore,
    dry_run: bool,
) -> Result<RunReport> {
    let prior = store.load().context("load prior snapshot")?;
    let batch = source.load().context("load source batch")?;
    info!(
        stage = %RunStage::Loaded,
        source = source.label(),
        input = batch.len(),
        canonical = prior.clubs.len(),
        "run started"
    );

    let outcome = consolidate_batch(prior, batch, cfg, source.label())?;
    let (snapshot, report) = outcome.into_snapshot();

    if dry_run {
        info!(stage = %RunStage::Persisted, dry_run = true, "skipping snapshot swap");
    } else {
        store.persist(&snapshot).context("persist snapshot")?;
        info!(
            stage = %RunStage::Persisted,
            clubs = snapshot.clubs.len(),
            states = snapshot.states.len(),
            cities = snapshot.cities.len(),
            "snapshot swapped"
        );
    }

    if !dry_run {
        let path = store.write_report(&report).context("write run report")?;
        info!(stage = %RunStage::Reported, report = %path.display(), "report written");
    }
    info!(
        total_input = report.total_input,
        added = report.added,
        enriched = report.enriched,
        unchanged = report.unchanged_skipped,
        duplicate_id = report.duplicate_id_skipped,
        unrecognized_state = report.unrecognized_state_skipped,
        missing_field = report.missing_field_skipped,
        fuzzy_merges = report.fuzzy_merges.len(),
        "run complete"
    );
    Ok(report)
}

/// Enrich an existing canonical record in place and count the outcome.
fn merge_into(canonical: &mut CanonicalSet, idx: usize, incoming: &ClubRecord, report: &mut RunReport) {
    let Some(existing) = canonical.get_mut(idx) else {
        return;
    };
    if enrich(existing, incoming) {
        report.enriched += 1;
    } else {
        report.record_skip(&incoming.name, SkipReason::Unchanged, None);
    }
}

/// Validate one raw record and shape it into a canonical candidate. Records
/// missing `name`, `city`, or a resolvable `state` are reported and excluded
/// from matching, never silently dropped.
fn validate(raw: &RawClubRecord, report: &mut RunReport) -> Option<ClubRecord> {
    let display = raw.name.as_deref().unwrap_or("<unnamed>").trim().to_string();

    let Some(name) = non_blank(raw.name.as_deref()) else {
        report.record_skip(&display, SkipReason::MissingField, Some("name".into()));
        return None;
    };
    let city = match non_blank(raw.city.as_deref()).map(|c| normalize_city(&c)) {
        Some(c) if !c.is_empty() => c,
        _ => {
            report.record_skip(&display, SkipReason::MissingField, Some("city".into()));
            return None;
        }
    };
    let Some(state_raw) = non_blank(raw.state.as_deref()) else {
        report.record_skip(&display, SkipReason::MissingField, Some("state".into()));
        return None;
    };
    let Some(state) = normalize_state(&state_raw) else {
        report.record_skip(&display, SkipReason::UnrecognizedState, Some(state_raw));
        return None;
    };

    let base_slug = slugify(&format!("{name} {city} {}", state.code));
    // Sources without a stable identifier fall back to the derived base slug,
    // which keeps re-imports of the same source duplicate-detectable.
    let external_id = non_blank(raw.external_id.as_deref()).unwrap_or_else(|| base_slug.clone());

    let record = ClubRecord {
        external_id,
        slug: base_slug,
        name,
        description: non_blank(raw.description.as_deref()),
        address: non_blank(raw.address.as_deref()).unwrap_or_default(),
        city_slug: slugify(&city),
        city,
        state_code: state.code.to_string(),
        state_name: state.name.to_string(),
        website: non_blank(raw.website.as_deref()),
        phone: non_blank(raw.phone.as_deref()),
        main_category: non_blank(raw.main_category.as_deref()),
        categories: non_blank(raw.categories.as_deref()),
        closed_on: non_blank(raw.closed_on.as_deref()),
        map_link: non_blank(raw.map_link.as_deref()),
        featured_image: non_blank(raw.featured_image.as_deref()),
        rating: raw.rating.unwrap_or(0.0),
        review_count: raw.review_count.unwrap_or(0),
        status: ClubStatus::Active,
    };
    Some(record)
}

fn non_blank(s: Option<&str>) -> Option<String> {
    match s {
        Some(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}
