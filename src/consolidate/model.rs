//! Core records for the consolidation pipeline: the canonical club shape, the
//! raw shape produced by source adapters, derived aggregates, and the in-memory
//! canonical working set with its uniqueness indexes.

use anyhow::{bail, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::normalization::normalize_name;

/// Lifecycle status. The pipeline preserves whatever status a record already
/// carries; records it creates itself are `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClubStatus {
    #[default]
    Active,
    Pending,
    Rejected,
}

/// One canonical directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubRecord {
    /// Source-stable opaque identifier (e.g. a scraper place id). Globally unique.
    pub external_id: String,
    /// URL-safe unique identifier. Never reassigned once issued.
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub address: String,
    /// Lowercase city display form.
    pub city: String,
    pub city_slug: String,
    /// Lowercase two-letter state code.
    pub state_code: String,
    /// Canonical state display name.
    pub state_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_category: Option<String>,
    /// Comma-joined category list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    /// 0.0 when unknown.
    #[serde(default)]
    pub rating: f64,
    /// 0 when unknown.
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub status: ClubStatus,
}

/// The common shape every source adapter produces. Required fields are
/// options so the Validated stage can reject incomplete records with a
/// reported reason instead of a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClubRecord {
    #[serde(default, alias = "placeId", alias = "place_id")]
    pub external_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// State name or code; resolved by the normalizer.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub main_category: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub closed_on: Option<String>,
    #[serde(default)]
    pub map_link: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

/// Per-state rollup, fully recomputed every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateAggregate {
    pub code: String,
    pub name: String,
    pub club_count: usize,
    pub city_count: usize,
}

/// Per-city rollup keyed by `(state_code, slug)`, fully recomputed every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityAggregate {
    pub name: String,
    pub slug: String,
    pub state_code: String,
    pub state_name: String,
    pub club_count: usize,
}

/// The canonical working set for one run.
///
/// Keeps the record list in stable insertion order (the matcher's tie-break
/// order), uniqueness indexes over external id and slug, and a cached
/// normalized-name column so the fuzzy scan does not re-normalize the whole
/// set for every incoming record.
#[derive(Debug, Default)]
pub struct CanonicalSet {
    clubs: Vec<ClubRecord>,
    by_external_id: IndexMap<String, usize>,
    by_slug: HashMap<String, usize>,
    normalized_names: Vec<String>,
}

impl CanonicalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a persisted snapshot. Duplicate external ids or slugs mean
    /// the snapshot violates the uniqueness invariants and is unusable.
    pub fn from_clubs(clubs: Vec<ClubRecord>) -> Result<Self> {
        let mut set = Self::default();
        for club in clubs {
            set.push(club)?;
        }
        Ok(set)
    }

    /// Append a record, enforcing the uniqueness invariants.
    pub fn push(&mut self, club: ClubRecord) -> Result<()> {
        if self.by_external_id.contains_key(&club.external_id) {
            bail!("duplicate external id in canonical set: {}", club.external_id);
        }
        if self.by_slug.contains_key(&club.slug) {
            bail!("duplicate slug in canonical set: {}", club.slug);
        }
        let idx = self.clubs.len();
        self.by_external_id.insert(club.external_id.clone(), idx);
        self.by_slug.insert(club.slug.clone(), idx);
        self.normalized_names.push(normalize_name(&club.name));
        self.clubs.push(club);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.clubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&ClubRecord> {
        self.clubs.get(idx)
    }

    /// Mutable access for enrichment. Identity fields must not be touched;
    /// the indexes are keyed on them.
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut ClubRecord> {
        self.clubs.get_mut(idx)
    }

    pub fn contains_external_id(&self, external_id: &str) -> bool {
        self.by_external_id.contains_key(external_id)
    }

    pub fn index_of_slug(&self, slug: &str) -> Option<usize> {
        self.by_slug.get(slug).copied()
    }

    pub fn clubs(&self) -> &[ClubRecord] {
        &self.clubs
    }

    /// Cached `normalize_name` output, index-aligned with [`clubs`](Self::clubs).
    pub fn normalized_names(&self) -> &[String] {
        &self.normalized_names
    }

    /// All issued slugs, for seeding the allocator's reserved set.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.by_slug.keys().map(String::as_str)
    }

    pub fn into_clubs(self) -> Vec<ClubRecord> {
        self.clubs
    }
}

#[cfg(test)]
pub(crate) fn test_club(external_id: &str, slug: &str, name: &str, state: (&str, &str), city: &str) -> ClubRecord {
    ClubRecord {
        external_id: external_id.to_string(),
        slug: slug.to_string(),
        name: name.to_string(),
        description: None,
        address: String::new(),
        city: city.to_string(),
        city_slug: crate::consolidate::slug::slugify(city),
        state_code: state.0.to_string(),
        state_name: state.1.to_string(),
        website: None,
        phone: None,
        main_category: None,
        categories: None,
        closed_on: None,
        map_link: None,
        featured_image: None,
        rating: 0.0,
        review_count: 0,
        status: ClubStatus::Active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_rejects_duplicate_external_id() {
        let mut set = CanonicalSet::new();
        set.push(test_club("x1", "a-tx", "A", ("tx", "Texas"), "Austin"))
            .unwrap();
        let dup = test_club("x1", "b-tx", "B", ("tx", "Texas"), "Austin");
        assert!(set.push(dup).is_err());
    }

    #[test]
    fn push_rejects_duplicate_slug() {
        let mut set = CanonicalSet::new();
        set.push(test_club("x1", "a-tx", "A", ("tx", "Texas"), "Austin"))
            .unwrap();
        let dup = test_club("x2", "a-tx", "B", ("tx", "Texas"), "Austin");
        assert!(set.push(dup).is_err());
    }

    #[test]
    fn normalized_names_stay_aligned() {
        let mut set = CanonicalSet::new();
        set.push(test_club(
            "x1",
            "iron-horsemen-austin-tx",
            "Iron Horsemen MC",
            ("tx", "Texas"),
            "Austin",
        ))
        .unwrap();
        assert_eq!(set.normalized_names()[0], "iron horsemen");
    }
}
