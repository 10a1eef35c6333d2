//! Full recomputation of per-state and per-city rollups.
//!
//! Aggregates are always rebuilt from the current club set, never patched
//! incrementally — incremental counts drift. Prior aggregates contribute only
//! their descriptive fields (and, for states, their presence in the reference
//! list), never their counts.

use std::collections::BTreeMap;

use crate::consolidate::model::{CityAggregate, ClubRecord, StateAggregate};

#[derive(Debug, Default)]
struct StateScan {
    club_count: usize,
    /// citySlug -> (display name, state name, club count), sorted by slug.
    cities: BTreeMap<String, CityScan>,
    state_name: String,
}

#[derive(Debug, Default)]
struct CityScan {
    name: String,
    state_name: String,
    club_count: usize,
}

/// One pass over `clubs`, then merge with the prior reference lists.
///
/// Pure and idempotent: identical input always yields identical, sorted
/// output (states by code, cities by `(state_code, name)`).
pub fn recompute(
    clubs: &[ClubRecord],
    prior_states: &[StateAggregate],
    prior_cities: &[CityAggregate],
) -> (Vec<StateAggregate>, Vec<CityAggregate>) {
    let mut scan: BTreeMap<String, StateScan> = BTreeMap::new();
    for club in clubs {
        let state = scan.entry(club.state_code.clone()).or_default();
        state.club_count += 1;
        if state.state_name.is_empty() {
            state.state_name = club.state_name.clone();
        }
        let city = state.cities.entry(club.city_slug.clone()).or_default();
        city.club_count += 1;
        if city.name.is_empty() {
            // First club encountered for the key names the city.
            city.name = club.city.clone();
            city.state_name = club.state_name.clone();
        }
    }

    let states = rebuild_states(&scan, prior_states);
    let cities = rebuild_cities(&scan, prior_cities);
    (states, cities)
}

fn rebuild_states(
    scan: &BTreeMap<String, StateScan>,
    prior_states: &[StateAggregate],
) -> Vec<StateAggregate> {
    // Every prior code/name pair survives, including zero-club states; the
    // counts are always the freshly computed ones.
    let mut out: Vec<StateAggregate> = prior_states
        .iter()
        .map(|prior| {
            let (club_count, city_count) = scan
                .get(&prior.code)
                .map(|s| (s.club_count, s.cities.len()))
                .unwrap_or((0, 0));
            StateAggregate {
                code: prior.code.clone(),
                name: prior.name.clone(),
                club_count,
                city_count,
            }
        })
        .collect();

    for (code, state) in scan {
        if prior_states.iter().any(|p| &p.code == code) {
            continue;
        }
        out.push(StateAggregate {
            code: code.clone(),
            name: state.state_name.clone(),
            club_count: state.club_count,
            city_count: state.cities.len(),
        });
    }

    out.sort_by(|a, b| a.code.cmp(&b.code));
    out
}

fn rebuild_cities(
    scan: &BTreeMap<String, StateScan>,
    prior_cities: &[CityAggregate],
) -> Vec<CityAggregate> {
    let mut out: Vec<CityAggregate> = Vec::new();
    for (code, state) in scan {
        for (slug, city) in &state.cities {
            let prior = prior_cities
                .iter()
                .find(|p| &p.state_code == code && &p.slug == slug);
            let agg = match prior {
                // Keep the prior descriptive fields; the count is always fresh.
                Some(prior) => CityAggregate {
                    name: prior.name.clone(),
                    slug: slug.clone(),
                    state_code: code.clone(),
                    state_name: prior.state_name.clone(),
                    club_count: city.club_count,
                },
                None => CityAggregate {
                    name: city.name.clone(),
                    slug: slug.clone(),
                    state_code: code.clone(),
                    state_name: city.state_name.clone(),
                    club_count: city.club_count,
                },
            };
            out.push(agg);
        }
    }

    out.sort_by(|a, b| (&a.state_code, &a.name).cmp(&(&b.state_code, &b.name)));
    out
}
