//! CSV decoder for case records
//!
//! The first record is the header. Every following record becomes a [`Row`]
//! keyed by header name:
//!
//! ```text
//! Sr. No.,PARTY1,PARTY2,CASE VALUE,TRANSFEREE COURT,CASE YEAR,ADVOCATE,NEXT DATE BY HIGH COURT
//! 1,Acme Ltd,State,"1,20,000",Delhi,2019,R. Sharma,2024-03-11
//! ```
//!
//! Quoted fields may contain the delimiter and line breaks. Structural
//! problems in individual records are reported as warnings instead of
//! aborting the whole decode.

use crate::data::Row;
use crate::error::{Error, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal problem found while decoding one record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecodeWarning {
    /// 1-based line the record starts on, when known
    pub line: Option<u64>,
    pub message: String,
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Output of a successful decode
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Trimmed header names in file order
    pub headers: Vec<String>,
    /// Rows in line order
    pub rows: Vec<Row>,
    pub warnings: Vec<DecodeWarning>,
}

/// Decoder for delimiter-separated case files
#[derive(Debug, Clone)]
pub struct CsvDecoder {
    delimiter: u8,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvDecoder {
    /// Create a decoder for comma-separated input
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different single-byte delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Decode raw CSV text into rows.
    ///
    /// Fails with [`Error::MalformedInput`] when there is no header or no
    /// data row at all.
    pub fn decode(&self, text: &str) -> Result<Decoded> {
        let text = text.trim_start_matches('\u{feff}');

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::MalformedInput(format!("Failed to read CSV header: {}", e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(Error::MalformedInput("CSV input has no header row".to_string()));
        }

        let mut rows = Vec::new();
        let mut warnings = Vec::new();

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warnings.push(DecodeWarning {
                        line: e.position().map(|p| p.line()),
                        message: format!("skipped unreadable record: {}", e),
                    });
                    continue;
                }
            };

            if is_blank(&record) {
                continue;
            }

            if record.len() != headers.len() {
                warnings.push(DecodeWarning {
                    line: record.position().map(|p| p.line()),
                    message: format!(
                        "expected {} fields, found {}",
                        headers.len(),
                        record.len()
                    ),
                });
            }

            rows.push(to_row(&headers, &record));
        }

        if rows.is_empty() {
            return Err(Error::MalformedInput(
                "CSV input has a header but no data rows".to_string(),
            ));
        }

        Ok(Decoded {
            headers,
            rows,
            warnings,
        })
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty) && record.len() <= 1
}

fn to_row(headers: &[String], record: &StringRecord) -> Row {
    Row::from_pairs(
        headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.as_str(), record.get(i).unwrap_or("").trim())),
    )
}

/// Decode comma-separated text with the default decoder
pub fn decode(text: &str) -> Result<Decoded> {
    CsvDecoder::new().decode(text)
}
