// src/precincts/extract.rs
//! HTML layout adapters.
//!
//! The precinct result pages have shipped in two revisions with different
//! table structures. Both are normalized into [`WardTable`]s here so the
//! row-walking rules in [`super::table`] live in one place.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::table::{WardTable, PRECINCT_KEY};
use super::LayoutError;

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("selector should parse"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("selector should parse"));
static CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("selector should parse"));
static TRAILING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*$").expect("regex should compile"));

fn cell_texts(row: ElementRef) -> Vec<String> {
    row.select(&CELL)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}

/// Ward tables are titled e.g. "Ward 31"; the trailing numeral is the ward.
fn ward_number(title: &str) -> Result<u32, LayoutError> {
    TRAILING_NUMBER
        .captures(title.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| LayoutError::BadWardTitle(title.trim().to_string()))
}

/// The site doubles single quotes in header labels; undo that.
fn header_key(raw: &str) -> String {
    raw.trim().replace("''", "'")
}

/// Legacy data-export layout.
///
/// The leading table is the document-wide total; it is redundant with the
/// per-ward breakdown and only supplies the column schema. The precinct
/// number is an unlabeled leading column, so the key list gets a synthetic
/// `precinct` prefix. Each ward table is a title row, a repeated header row,
/// then one row per precinct.
pub fn data_export(html: &str) -> Result<Vec<WardTable>, LayoutError> {
    let doc = Html::parse_document(html);
    let mut tables = doc.select(&TABLE);

    let total = tables.next().ok_or(LayoutError::NoTables)?;
    let header = total.select(&ROW).next().ok_or(LayoutError::MissingHeader)?;
    let mut keys = vec![PRECINCT_KEY.to_string()];
    keys.extend(cell_texts(header).iter().map(|raw| header_key(raw)));

    let mut out = Vec::new();
    for table in tables {
        let mut rows = table.select(&ROW);
        let title_row = rows.next().ok_or(LayoutError::MissingWardTitle)?;
        let ward = ward_number(&title_row.text().collect::<String>())?;
        rows.next().ok_or(LayoutError::MissingHeader)?; // repeated header row
        out.push(WardTable {
            ward,
            keys: keys.clone(),
            rows: rows.map(cell_texts).collect(),
        });
    }
    Ok(out)
}

/// Revised layout: every ward table carries its own header row whose
/// `Precinct`-labeled column maps to the precinct key.
pub fn results_page(html: &str) -> Result<Vec<WardTable>, LayoutError> {
    let doc = Html::parse_document(html);
    let mut tables = doc.select(&TABLE);

    // Document-wide total, redundant with the ward breakdown.
    tables.next().ok_or(LayoutError::NoTables)?;

    let mut out = Vec::new();
    for table in tables {
        let mut rows = table.select(&ROW);
        let title_row = rows.next().ok_or(LayoutError::MissingWardTitle)?;
        let ward = ward_number(&title_row.text().collect::<String>())?;
        let header = rows.next().ok_or(LayoutError::MissingHeader)?;
        let keys = cell_texts(header)
            .iter()
            .map(|raw| {
                let key = header_key(raw);
                if key.eq_ignore_ascii_case(PRECINCT_KEY) {
                    PRECINCT_KEY.to_string()
                } else {
                    key
                }
            })
            .collect();
        out.push(WardTable {
            ward,
            keys,
            rows: rows.map(cell_texts).collect(),
        });
    }
    Ok(out)
}
