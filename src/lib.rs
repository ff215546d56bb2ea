//! Scrape and parse results published by the Chicago Board of Elections.
//!
//! Two independent engines share a data-modeling convention but no code:
//! [`summary`] parses the fixed-width racewide export, and [`precincts`]
//! scrapes the per-race precinct-level HTML tables. [`fetch`] wraps both in
//! thin HTTP collaborators.

pub mod fetch;
pub mod precincts;
pub mod summary;

pub use precincts::{LayoutError, PrecinctResults, RaceOption};
pub use summary::{CandidateResult, Race};
