//! Validation for CLI arguments

use crate::error::{Error, Result};
use std::path::Path;

/// Validate a CSV delimiter and convert it to the byte the decoder expects
pub fn validate_delimiter(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        return Err(Error::Validation(format!(
            "Delimiter must be a single ASCII character, got '{}'",
            delimiter
        )));
    }

    if delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
        return Err(Error::Validation(format!(
            "Delimiter cannot be {:?}",
            delimiter
        )));
    }

    Ok(delimiter as u8)
}

/// Validate directory exists and is writable
pub fn validate_dir_writable(path: &Path, description: &str) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(Error::Validation(format!(
            "{} exists but is not a directory: {}",
            description,
            path.display()
        )));
    }

    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| {
            Error::Validation(format!(
                "Cannot create {}: {}: {}",
                description,
                path.display(),
                e
            ))
        })?;
    }

    let probe = path.join(".case_dash_write_test");
    match std::fs::write(&probe, "test") {
        Ok(_) => {
            let _ = std::fs::remove_file(&probe);
            Ok(())
        }
        Err(e) => Err(Error::Validation(format!(
            "{} is not writable: {}: {}",
            description,
            path.display(),
            e
        ))),
    }
}
