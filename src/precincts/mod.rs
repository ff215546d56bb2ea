// src/precincts/mod.rs
//! Parse tabular precinct-level results.
//!
//! The per-race result pages carry one HTML table per ward after a leading
//! document-wide total table. [`extract`] normalizes either page revision
//! into [`table::WardTable`]s; [`table::collect`] walks the rows into a
//! sparse (ward, precinct) map. Ward and racewide aggregates are pure
//! reductions over that map, recomputed on demand.

pub mod extract;
pub mod table;

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Votes per choice.
pub type VoteCounts = BTreeMap<String, i64>;

/// The source document did not match the expected table structure.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("document contains no results tables")]
    NoTables,
    #[error("results table has no header row")]
    MissingHeader,
    #[error("ward table is missing its title row")]
    MissingWardTitle,
    #[error("no ward number in table title {0:?}")]
    BadWardTitle(String),
    #[error("ward {ward}: row has no precinct column")]
    MissingPrecinct { ward: u32 },
    #[error("ward {ward}: unparseable precinct number {value:?}")]
    BadPrecinct { ward: u32, value: String },
    #[error("ward {ward}: unparseable vote count {value:?} under {key:?}")]
    BadCount { ward: u32, key: String, value: String },
}

/// Sparse per-precinct vote counts for one race, keyed by (ward, precinct).
#[derive(Debug, Clone, Default)]
pub struct PrecinctResults {
    precincts: BTreeMap<(u32, u32), VoteCounts>,
}

impl PrecinctResults {
    pub fn precincts(&self) -> &BTreeMap<(u32, u32), VoteCounts> {
        &self.precincts
    }

    /// Per-ward sums across that ward's precincts. A choice absent from a
    /// given precinct's mapping contributes zero.
    pub fn wards(&self) -> BTreeMap<u32, VoteCounts> {
        let mut out: BTreeMap<u32, VoteCounts> = BTreeMap::new();
        for (&(ward, _), votes) in &self.precincts {
            let entry = out.entry(ward).or_default();
            for (choice, n) in votes {
                *entry.entry(choice.clone()).or_insert(0) += n;
            }
        }
        out
    }

    /// Racewide sums across every ward and precinct.
    pub fn total(&self) -> VoteCounts {
        let mut out = VoteCounts::new();
        for votes in self.precincts.values() {
            for (choice, n) in votes {
                *out.entry(choice.clone()).or_insert(0) += n;
            }
        }
        out
    }
}

impl From<BTreeMap<(u32, u32), VoteCounts>> for PrecinctResults {
    fn from(precincts: BTreeMap<(u32, u32), VoteCounts>) -> Self {
        Self { precincts }
    }
}

/// Parse the legacy data-export page layout.
#[tracing::instrument(level = "debug", skip(html))]
pub fn parse_data_export(html: &str) -> Result<PrecinctResults, LayoutError> {
    let results = table::collect(extract::data_export(html)?)?;
    debug!(precincts = results.precincts.len(), "parsed data-export page");
    Ok(results)
}

/// Parse the revised page layout where every ward table carries its own
/// header row.
#[tracing::instrument(level = "debug", skip(html))]
pub fn parse_results_page(html: &str) -> Result<PrecinctResults, LayoutError> {
    let results = table::collect(extract::results_page(html)?)?;
    debug!(precincts = results.precincts.len(), "parsed results page");
    Ok(results)
}

/// A race option listed for an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceOption {
    pub name: String,
    pub number: String,
}

/// Separate the registered-voters turnout pseudo-race from the real races.
/// Exactly one option per election carries registration counts instead of a
/// candidate contest; it is identified by its display name.
pub fn split_turnout(options: Vec<RaceOption>) -> (Vec<RaceOption>, Option<RaceOption>) {
    let mut races = Vec::with_capacity(options.len());
    let mut turnout = None;
    for opt in options {
        if opt.name.to_lowercase().contains("registered voters") {
            turnout = Some(opt);
        } else {
            races.push(opt);
        }
    }
    (races, turnout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes(pairs: &[(&str, i64)]) -> VoteCounts {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    fn sample() -> PrecinctResults {
        let mut map = BTreeMap::new();
        map.insert((1, 1), votes(&[("ALICE", 10), ("BOB", 5)]));
        map.insert((1, 2), votes(&[("ALICE", 3), ("BOB", 7)]));
        map.insert((2, 1), votes(&[("ALICE", 1), ("BOB", 2)]));
        PrecinctResults::from(map)
    }

    #[test]
    fn wards_sum_each_choice_across_precincts() {
        let wards = sample().wards();
        assert_eq!(wards.len(), 2);
        assert_eq!(wards[&1], votes(&[("ALICE", 13), ("BOB", 12)]));
        assert_eq!(wards[&2], votes(&[("ALICE", 1), ("BOB", 2)]));
    }

    #[test]
    fn total_sums_each_choice_across_all_precincts() {
        assert_eq!(sample().total(), votes(&[("ALICE", 14), ("BOB", 14)]));
    }

    #[test]
    fn aggregates_tolerate_heterogeneous_choice_sets() {
        let mut map = BTreeMap::new();
        map.insert((1, 1), votes(&[("ALICE", 10)]));
        map.insert((1, 2), votes(&[("BOB", 4)]));
        let results = PrecinctResults::from(map);

        assert_eq!(results.wards()[&1], votes(&[("ALICE", 10), ("BOB", 4)]));
        assert_eq!(results.total(), votes(&[("ALICE", 10), ("BOB", 4)]));
    }

    #[test]
    fn split_turnout_pulls_out_the_registration_option() {
        let options = vec![
            RaceOption { name: "Mayor".to_string(), number: "10".to_string() },
            RaceOption { name: "Ballots Cast - Registered Voters".to_string(), number: "0".to_string() },
            RaceOption { name: "City Clerk".to_string(), number: "11".to_string() },
        ];

        let (races, turnout) = split_turnout(options);
        assert_eq!(races.len(), 2);
        assert!(races.iter().all(|r| r.name != "Ballots Cast - Registered Voters"));
        assert_eq!(turnout.unwrap().number, "0");
    }
}
