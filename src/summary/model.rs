// src/summary/model.rs
use serde::Serialize;

use super::layout::SummaryRecord;

/// Racewide results for one contest.
///
/// Created lazily on the first summary line carrying its contest code; the
/// race-level fields come from that first line and later lines only append
/// candidates. All numeric fields are optional because blank placeholders
/// are routine before results are certified.
#[derive(Debug, Clone, Serialize)]
pub struct Race {
    pub contest_code: Option<i64>,
    pub name: String,
    pub reporting_unit_name: String,
    pub total_ballots_cast: Option<i64>,
    pub precincts_total: Option<i64>,
    pub precincts_reporting: Option<i64>,
    pub vote_for: Option<i64>,
    pub candidates: Vec<CandidateResult>,
}

/// One choice's racewide vote total.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateResult {
    pub candidate_number: Option<i64>,
    pub full_name: String,
    pub party: String,
    pub vote_total: Option<i64>,
    /// Key of the owning race, kept for display; not an owning reference.
    pub contest_code: Option<i64>,
}

impl Race {
    pub(crate) fn from_record(rec: &SummaryRecord) -> Self {
        Self {
            contest_code: rec.int("contest_code"),
            name: rec.text("race_name").to_string(),
            reporting_unit_name: rec.text("reporting_unit_name").to_string(),
            total_ballots_cast: rec.int("race_total_ballots_cast"),
            precincts_total: rec.int("precincts_total"),
            precincts_reporting: rec.int("precincts_reporting"),
            vote_for: rec.int("vote_for"),
            candidates: Vec::new(),
        }
    }

    /// Flat projection: one row per candidate, race attributes merged in.
    /// This is the shape the CSV layer writes.
    pub fn rows(&self) -> impl Iterator<Item = SummaryRow<'_>> + '_ {
        self.candidates.iter().map(move |c| SummaryRow {
            contest_code: self.contest_code,
            race_name: &self.name,
            precincts_total: self.precincts_total,
            precincts_reporting: self.precincts_reporting,
            vote_for: self.vote_for,
            candidate_number: c.candidate_number,
            full_name: &c.full_name,
            party: &c.party,
            vote_total: c.vote_total,
        })
    }
}

impl CandidateResult {
    pub(crate) fn from_record(rec: &SummaryRecord) -> Self {
        Self {
            candidate_number: rec.int("candidate_number"),
            full_name: rec.text("candidate_name").to_string(),
            party: rec.text("party").to_string(),
            vote_total: rec.int("vote_total"),
            contest_code: rec.int("contest_code"),
        }
    }
}

/// One race-plus-candidate output row. Field order here is the CSV column
/// order.
#[derive(Debug, Serialize)]
pub struct SummaryRow<'a> {
    pub contest_code: Option<i64>,
    pub race_name: &'a str,
    pub precincts_total: Option<i64>,
    pub precincts_reporting: Option<i64>,
    pub vote_for: Option<i64>,
    pub candidate_number: Option<i64>,
    pub full_name: &'a str,
    pub party: &'a str,
    pub vote_total: Option<i64>,
}
