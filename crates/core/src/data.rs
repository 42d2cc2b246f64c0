//! Row records, snapshots and per-row derived values

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Column names recognized by the dashboard (exact, case-sensitive)
pub mod columns {
    pub const SERIAL_NO: &str = "Sr. No.";
    pub const PARTY1: &str = "PARTY1";
    pub const PARTY2: &str = "PARTY2";
    pub const CASE_VALUE: &str = "CASE VALUE";
    pub const TRANSFEREE_COURT: &str = "TRANSFEREE COURT";
    pub const CASE_YEAR: &str = "CASE YEAR";
    pub const ADVOCATE: &str = "ADVOCATE";
    pub const NEXT_DATE: &str = "NEXT DATE BY HIGH COURT";
}

/// Key used when a grouping column is absent or blank
pub const DEFAULT_GROUP_KEY: &str = "Unknown";

/// One decoded CSV line as a column-name to value mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    /// Build a row from `(column, value)` pairs. Later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value of a column, if the column exists in this row
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Trimmed value of a column, `None` when absent or blank
    pub fn non_blank(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Value of a column or `fallback` when absent or blank
    pub fn display<'a>(&'a self, column: &str, fallback: &'a str) -> &'a str {
        self.non_blank(column).unwrap_or(fallback)
    }

    /// Grouping key for `column`, falling back to `default_key`
    pub fn group_key<'a>(&'a self, column: &str, default_key: &'a str) -> &'a str {
        self.display(column, default_key)
    }

    /// Monetary value of `column`; never fails (see [`parse_monetary`])
    pub fn monetary(&self, column: &str) -> f64 {
        self.get(column).map(parse_monetary).unwrap_or(0.0)
    }

    /// Monetary value of the `CASE VALUE` column
    pub fn case_value(&self) -> f64 {
        self.monetary(columns::CASE_VALUE)
    }

    /// Pending iff the next-hearing-date column is present and non-blank
    pub fn status(&self) -> CaseStatus {
        if self.non_blank(columns::NEXT_DATE).is_some() {
            CaseStatus::Pending
        } else {
            CaseStatus::Disposed
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Derived case status, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Pending,
    Disposed,
}

impl CaseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "Pending",
            CaseStatus::Disposed => "Disposed",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("leading number regex is valid")
    })
}

/// Parse a currency-like text field into a non-negative amount.
///
/// Thousands separators are stripped and the longest leading decimal number
/// is used, so `"1,000"` is 1000 and `"12 lakh"` is 12. Missing digits,
/// negative amounts and non-finite results all coerce to 0.
pub fn parse_monetary(raw: &str) -> f64 {
    let cleaned = raw.replace(',', "");
    let value = leading_number()
        .find(cleaned.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);

    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// A decoded row sequence together with where and when it came from.
///
/// Snapshots are replaced wholesale on every load; nothing is mutated in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// Human-readable source label (path, URL or uploaded file name)
    pub source: String,
    /// When the snapshot was decoded
    pub loaded_at: DateTime<Utc>,
    /// Load generation, increasing with every accepted load
    pub generation: u64,
    /// Rows in CSV line order
    pub rows: Vec<Row>,
    /// Structural warnings reported by the decoder
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_monetary_strips_separators() {
        assert_eq!(parse_monetary("1,000"), 1000.0);
        assert_eq!(parse_monetary("2,500"), 2500.0);
        assert_eq!(parse_monetary("1,23,45,678.50"), 12345678.5);
    }

    #[test]
    fn test_parse_monetary_leading_prefix() {
        assert_eq!(parse_monetary("12abc"), 12.0);
        assert_eq!(parse_monetary("  42 "), 42.0);
        assert_eq!(parse_monetary(".5"), 0.5);
        assert_eq!(parse_monetary("1e3"), 1000.0);
    }

    #[test]
    fn test_parse_monetary_coerces_to_zero() {
        assert_eq!(parse_monetary(""), 0.0);
        assert_eq!(parse_monetary("abc"), 0.0);
        assert_eq!(parse_monetary("-500"), 0.0);
        assert_eq!(parse_monetary("₹100"), 0.0);
        assert_eq!(parse_monetary("1e999"), 0.0);
    }

    #[test]
    fn test_row_status() {
        let pending = Row::from_pairs([(columns::NEXT_DATE, "2024-01-01")]);
        let blank = Row::from_pairs([(columns::NEXT_DATE, "   ")]);
        let missing = Row::from_pairs([(columns::PARTY1, "A")]);

        assert_eq!(pending.status(), CaseStatus::Pending);
        assert_eq!(blank.status(), CaseStatus::Disposed);
        assert_eq!(missing.status(), CaseStatus::Disposed);
    }

    #[test]
    fn test_row_group_key_defaults() {
        let row = Row::from_pairs([(columns::TRANSFEREE_COURT, " Delhi "), (columns::ADVOCATE, "")]);

        assert_eq!(row.group_key(columns::TRANSFEREE_COURT, DEFAULT_GROUP_KEY), "Delhi");
        assert_eq!(row.group_key(columns::ADVOCATE, DEFAULT_GROUP_KEY), "Unknown");
        assert_eq!(row.group_key(columns::CASE_YEAR, DEFAULT_GROUP_KEY), "Unknown");
        assert_eq!(row.case_value(), 0.0);
    }
}
