//! Upload boundary: a user-selected file with a declared content type

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Media types accepted as CSV
pub const CSV_CONTENT_TYPES: &[&str] = &[
    "text/csv",
    "application/csv",
    "text/x-csv",
    "text/comma-separated-values",
];

/// A file offered for upload. The content is read only after the declared
/// type has been accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Upload {
    /// File name as presented to the user
    pub file_name: String,
    /// Declared media type, e.g. `text/csv; charset=utf-8`
    pub content_type: String,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
        }
    }

    /// Reject anything whose declared type is not CSV-like
    pub fn validate(&self) -> Result<()> {
        if is_csv_content_type(&self.content_type) {
            Ok(())
        } else {
            Err(Error::InvalidUpload {
                file_name: self.file_name.clone(),
                content_type: self.content_type.clone(),
            })
        }
    }
}

/// True for CSV media types, ignoring case and parameters
pub fn is_csv_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    CSV_CONTENT_TYPES.contains(&essence.as_str())
}

/// Best-effort media type for a file name, used when none is declared
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_csv_content_type() {
        assert!(is_csv_content_type("text/csv"));
        assert!(is_csv_content_type("TEXT/CSV; charset=utf-8"));
        assert!(is_csv_content_type("application/csv"));

        assert!(!is_csv_content_type(""));
        assert!(!is_csv_content_type("text/plain"));
        assert!(!is_csv_content_type("application/json"));
    }

    #[test]
    fn test_validate_rejects_non_csv() {
        let upload = Upload::new("cases.json", "application/json");
        assert!(matches!(upload.validate(), Err(Error::InvalidUpload { .. })));

        let upload = Upload::new("cases.csv", "text/csv");
        assert!(upload.validate().is_ok());
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("cases.CSV"), "text/csv");
        assert_eq!(content_type_for("cases.txt"), "text/plain");
        assert_eq!(content_type_for("cases"), "application/octet-stream");
    }
}
