//! Error types for case-dash-core (WASM-compatible)

use thiserror::Error;

/// Result type alias for case-dash-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the load and upload boundaries.
///
/// Row-level numeric coercion never produces an error; unparsable values
/// contribute 0 to every aggregate instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Source unavailable: {source_name}: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid upload: {file_name} has declared type '{content_type}', expected a CSV file")]
    InvalidUpload {
        file_name: String,
        content_type: String,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
