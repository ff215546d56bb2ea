// src/summary/mod.rs
//! Parse the fixed-width summary export.
//!
//! The export lives under `results/ap/` before election day for testing and
//! under `ap/` on election night. It carries racewide totals, one choice per
//! line; lines sharing a contest code belong to the same race.

pub mod layout;
pub mod model;

pub use model::{CandidateResult, Race, SummaryRow};

use std::collections::HashMap;

use tracing::debug;

use layout::SUMMARY_EXPORT;

/// Parse the whole export into races.
///
/// Each line is parsed independently against the summary layout, then grouped
/// by contest code: the first line seen for a code creates the race and
/// supplies its race-level fields, later lines only append candidates. Races
/// come out in first-seen order, candidates in file order. Lines never abort
/// the batch; unparseable numeric sub-fields surface as `None` values.
#[tracing::instrument(level = "debug", skip(text))]
pub fn parse(text: &str) -> Vec<Race> {
    let mut races: Vec<Race> = Vec::new();
    let mut by_code: HashMap<Option<i64>, usize> = HashMap::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let rec = SUMMARY_EXPORT.parse_line(line);
        let code = rec.int("contest_code");
        let idx = *by_code.entry(code).or_insert_with(|| {
            races.push(Race::from_record(&rec));
            races.len() - 1
        });
        races[idx].candidates.push(CandidateResult::from_record(&rec));
    }

    debug!(races = races.len(), "parsed summary export");
    races
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(buf: &mut [char], start: usize, value: &str) {
        for (i, ch) in value.chars().enumerate() {
            buf[start - 1 + i] = ch;
        }
    }

    fn result_line(contest: i64, candidate_number: i64, race: &str, candidate: &str, votes: &str) -> String {
        let mut buf = vec![' '; 272];
        place(&mut buf, 1, "2");
        place(&mut buf, 2, &format!("{contest:05}"));
        place(&mut buf, 7, &format!("{candidate_number:05}"));
        place(&mut buf, 12, "00000");
        place(&mut buf, 17, votes);
        place(&mut buf, 38, race);
        place(&mut buf, 108, candidate);
        place(&mut buf, 211, "MUNICIPAL");
        place(&mut buf, 266, "01291");
        place(&mut buf, 271, " 1");
        buf.into_iter().collect()
    }

    #[test]
    fn races_come_out_in_first_seen_order() {
        let text = [
            result_line(5, 1, "City Treasurer", "MELISSA CONYEARS-ERVIN", "0000100"),
            result_line(1, 7, "Mayor", "LORI E. LIGHTFOOT", "0000200"),
            result_line(5, 2, "City Treasurer", "PETER GARIEPY", "0000300"),
            result_line(1, 9, "Mayor", "WILLIE L. WILSON", "0000400"),
        ]
        .join("\n");

        let races = parse(&text);
        assert_eq!(races.len(), 2);
        assert_eq!(races[0].name, "City Treasurer");
        assert_eq!(races[1].name, "Mayor");
    }

    #[test]
    fn candidates_stay_in_file_order_within_a_race() {
        let text = [
            result_line(1, 9, "Mayor", "WILLIE L. WILSON", "0000010"),
            result_line(1, 7, "Mayor", "LORI E. LIGHTFOOT", "0000020"),
        ]
        .join("\n");

        let races = parse(&text);
        assert_eq!(races.len(), 1);
        let names: Vec<_> = races[0].candidates.iter().map(|c| c.full_name.as_str()).collect();
        assert_eq!(names, ["WILLIE L. WILSON", "LORI E. LIGHTFOOT"]);
        assert_eq!(races[0].candidates[0].vote_total, Some(10));
        assert_eq!(races[0].candidates[1].contest_code, Some(1));
    }

    #[test]
    fn first_occurrence_wins_race_metadata() {
        let text = [
            result_line(3, 1, "Alderperson 1st Ward", "A", "0000000"),
            result_line(3, 2, "Some Other Label", "B", "0000000"),
        ]
        .join("\n");

        let races = parse(&text);
        assert_eq!(races.len(), 1);
        assert_eq!(races[0].name, "Alderperson 1st Ward");
        assert_eq!(races[0].candidates.len(), 2);
    }

    #[test]
    fn blank_vote_fields_parse_to_none() {
        let races = parse(&result_line(1, 7, "Mayor", "LORI E. LIGHTFOOT", "       "));
        assert_eq!(races[0].candidates[0].vote_total, None);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = format!("\n{}\n\n", result_line(1, 7, "Mayor", "LORI E. LIGHTFOOT", "0000000"));
        let races = parse(&text);
        assert_eq!(races.len(), 1);
        assert_eq!(races[0].candidates.len(), 1);
    }
}
