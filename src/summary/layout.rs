// src/summary/layout.rs
use std::collections::BTreeMap;

/// How a field's raw text is handled after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Keep the trimmed text. An empty string is a valid value.
    Text,
    /// Parse as an integer; failure yields [`FieldValue::Null`].
    Int,
    /// Text with apostrophe-like marks normalized to a plain `'`.
    PersonName,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    /// Numeric coercion failed. Blank numeric fields are routine in
    /// not-yet-reported data, so this is a value, never an error.
    Null,
}

/// One positional field of a fixed-width record.
///
/// `start` is the 1-based column position exactly as the export format
/// documentation gives it; `len` counts characters, not bytes.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub len: usize,
    pub coerce: Coercion,
}

impl FieldSpec {
    /// Extract and coerce this field's slice of `line`. A line shorter than
    /// `start + len` simply yields a shortened or null value.
    pub fn parse(&self, line: &str) -> FieldValue {
        let raw: String = line.chars().skip(self.start - 1).take(self.len).collect();
        let trimmed = raw.trim();
        match self.coerce {
            Coercion::Text => FieldValue::Text(trimmed.to_string()),
            Coercion::PersonName => FieldValue::Text(normalize_apostrophes(trimmed)),
            Coercion::Int => match trimmed.parse::<i64>() {
                Ok(n) => FieldValue::Int(n),
                Err(_) => FieldValue::Null,
            },
        }
    }
}

/// Replace curly and backtick apostrophe variants with ASCII `'`.
pub fn normalize_apostrophes(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{02BC}' | '`' => '\'',
            other => other,
        })
        .collect()
}

/// An ordered set of field specs bound to one named record format.
#[derive(Debug)]
pub struct RecordLayout {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl RecordLayout {
    /// Apply every field to `line` independently and collect the values.
    /// No record-length validation happens here; a truncated line yields
    /// null or shortened values per field.
    pub fn parse_line(&self, line: &str) -> SummaryRecord {
        let mut values = BTreeMap::new();
        for field in self.fields {
            values.insert(field.name, field.parse(line));
        }
        SummaryRecord { values }
    }
}

/// Flat field-name → value mapping for one parsed line.
#[derive(Debug)]
pub struct SummaryRecord {
    values: BTreeMap<&'static str, FieldValue>,
}

impl SummaryRecord {
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FieldValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }
}

/// Summary Export File Format, from SummaryExportFormat.xls:
///
/// ```text
/// Record type                          1         1
/// Global contest order                 5         2-6
/// Global choice order                  5         7-11
/// # Completed precincts                5         12-16
/// Votes                                7         17-23
/// Contest Total registration           7         24-30
/// Contest Total ballots cast           7         31-37
/// Contest Name                        70         38-107
/// Choice Name                         50         108-157
/// Choice Party Name                   50         158-207
/// Choice Party Abbreviation            3         208-210
/// District Type Name                  50         211-260
/// District Type Global Order           5         261-265
/// # of Eligible Precincts              5         266-270
/// Vote For                             2         271-272
/// ```
///
/// `record_type` is parsed but not checked; no other record types have been
/// observed in the wild.
pub static SUMMARY_EXPORT: RecordLayout = RecordLayout {
    name: "summary_export",
    fields: &[
        FieldSpec { name: "record_type", start: 1, len: 1, coerce: Coercion::Int },
        FieldSpec { name: "contest_code", start: 2, len: 5, coerce: Coercion::Int },
        FieldSpec { name: "candidate_number", start: 7, len: 5, coerce: Coercion::Int },
        FieldSpec { name: "precincts_reporting", start: 12, len: 5, coerce: Coercion::Int },
        FieldSpec { name: "vote_total", start: 17, len: 7, coerce: Coercion::Int },
        FieldSpec { name: "race_total_registration", start: 24, len: 7, coerce: Coercion::Int },
        FieldSpec { name: "race_total_ballots_cast", start: 31, len: 7, coerce: Coercion::Int },
        FieldSpec { name: "race_name", start: 38, len: 70, coerce: Coercion::Text },
        FieldSpec { name: "candidate_name", start: 108, len: 50, coerce: Coercion::PersonName },
        FieldSpec { name: "party", start: 158, len: 50, coerce: Coercion::Text },
        FieldSpec { name: "party_abbreviation", start: 208, len: 3, coerce: Coercion::Text },
        FieldSpec { name: "reporting_unit_name", start: 211, len: 50, coerce: Coercion::Text },
        FieldSpec { name: "reporting_unit_code", start: 261, len: 5, coerce: Coercion::Int },
        FieldSpec { name: "precincts_total", start: 266, len: 5, coerce: Coercion::Int },
        FieldSpec { name: "vote_for", start: 271, len: 2, coerce: Coercion::Int },
    ],
};
