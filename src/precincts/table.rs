// src/precincts/table.rs
//! Stable row/table model shared by the HTML layout adapters.

use std::collections::BTreeMap;

use super::{LayoutError, PrecinctResults, VoteCounts};

/// Positional key marking the precinct-number column.
pub const PRECINCT_KEY: &str = "precinct";

/// Ward subtotal rows carry this literal in place of a precinct number.
/// There is no tag-level marker distinguishing them from precinct rows; the
/// sentinel text is the only reliable signal.
const SUBTOTAL_SENTINEL: &str = "Total";

/// One ward's results table, normalized out of whichever page revision it
/// came from. `keys` lines up positionally with the cells of every row in
/// `rows` and contains [`PRECINCT_KEY`] at the precinct column.
#[derive(Debug, Clone)]
pub struct WardTable {
    pub ward: u32,
    pub keys: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Percentage columns and the precomputed vote totals are presentation
/// artifacts, not raw counts.
fn is_derived(key: &str) -> bool {
    key.contains('%') || key == "Votes"
}

fn parse_count(cell: &str) -> Option<i64> {
    cell.replace(',', "").parse().ok()
}

/// Walk every data row of every ward table into the (ward, precinct) map.
///
/// Per row: a `"Total"` cell aborts the row and discards everything
/// accumulated for it (ward subtotal, not a precinct); the precinct column
/// becomes the row key; derived columns are skipped; every other cell must
/// coerce to a count. A cell that still fails to coerce means the page does
/// not have the layout we expect, so the whole parse fails rather than
/// emitting partial results.
pub fn collect(tables: Vec<WardTable>) -> Result<PrecinctResults, LayoutError> {
    let mut precincts: BTreeMap<(u32, u32), VoteCounts> = BTreeMap::new();

    for table in tables {
        for row in &table.rows {
            let mut votes = VoteCounts::new();
            let mut precinct = None;
            let mut subtotal = false;

            for (key, cell) in table.keys.iter().zip(row.iter()) {
                let cell = cell.trim();
                if cell == SUBTOTAL_SENTINEL {
                    subtotal = true;
                    break;
                }
                if key == PRECINCT_KEY {
                    precinct = Some(cell.replace(',', "").parse::<u32>().map_err(|_| {
                        LayoutError::BadPrecinct { ward: table.ward, value: cell.to_string() }
                    })?);
                    continue;
                }
                if is_derived(key) {
                    continue;
                }
                let count = parse_count(cell).ok_or_else(|| LayoutError::BadCount {
                    ward: table.ward,
                    key: key.clone(),
                    value: cell.to_string(),
                })?;
                votes.insert(key.clone(), count);
            }

            if subtotal {
                continue;
            }
            let precinct = precinct.ok_or(LayoutError::MissingPrecinct { ward: table.ward })?;
            precincts.insert((table.ward, precinct), votes);
        }
    }

    Ok(PrecinctResults::from(precincts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ward_table(ward: u32, keys: &[&str], rows: &[&[&str]]) -> WardTable {
        WardTable {
            ward,
            keys: keys.iter().map(|k| k.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    const KEYS: &[&str] = &["precinct", "ALICE", "%", "BOB", "%", "Votes"];

    #[test]
    fn subtotal_rows_contribute_nothing() {
        let table = ward_table(
            3,
            KEYS,
            &[
                &["1", "10", "50%", "10", "50%", "20"],
                &["Total", "10", "50%", "10", "50%", "20"],
            ],
        );

        let results = collect(vec![table]).unwrap();
        assert_eq!(results.precincts().len(), 1);
        assert!(results.precincts().contains_key(&(3, 1)));
    }

    #[test]
    fn mid_row_sentinel_discards_already_accumulated_cells() {
        let table = ward_table(3, KEYS, &[&["2", "8", "Total", "1", "0%", "9"]]);

        let results = collect(vec![table]).unwrap();
        assert!(results.precincts().is_empty());
        assert_eq!(results.total(), VoteCounts::new());
    }

    #[test]
    fn derived_columns_are_excluded_from_vote_counts() {
        let table = ward_table(1, KEYS, &[&["4", "12", "60%", "8", "40%", "20"]]);

        let results = collect(vec![table]).unwrap();
        let votes = &results.precincts()[&(1, 4)];
        assert_eq!(votes.len(), 2);
        assert_eq!(votes["ALICE"], 12);
        assert_eq!(votes["BOB"], 8);
        assert!(!votes.contains_key("Votes"));
    }

    #[test]
    fn thousands_separators_are_stripped() {
        let table = ward_table(
            1,
            &["precinct", "ALICE"],
            &[&["1", "1,234"]],
        );

        let results = collect(vec![table]).unwrap();
        assert_eq!(results.precincts()[&(1, 1)]["ALICE"], 1234);
    }

    #[test]
    fn unparseable_count_is_a_layout_error() {
        let table = ward_table(7, &["precinct", "ALICE"], &[&["1", "n/a"]]);

        match collect(vec![table]) {
            Err(LayoutError::BadCount { ward: 7, key, value }) => {
                assert_eq!(key, "ALICE");
                assert_eq!(value, "n/a");
            }
            other => panic!("expected BadCount, got {other:?}"),
        }
    }

    #[test]
    fn row_without_precinct_column_is_a_layout_error() {
        let table = ward_table(2, &["ALICE", "BOB"], &[&["5", "6"]]);

        assert!(matches!(
            collect(vec![table]),
            Err(LayoutError::MissingPrecinct { ward: 2 })
        ));
    }
}
