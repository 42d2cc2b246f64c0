//! Reading CSV text from the sample location or an uploaded file

use crate::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Where the bundled sample lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Remote(Url),
}

impl Source {
    /// Interpret a location given on the command line.
    ///
    /// `http(s)://` locations are fetched over the network, `file://` URLs and
    /// everything else are treated as local paths.
    pub fn parse(location: &str) -> Result<Self> {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Source::Remote(Url::parse(location)?));
        }
        if lower.starts_with("file://") {
            let url = Url::parse(location)?;
            let path = url.to_file_path().map_err(|_| {
                crate::error::Error::Validation(format!("Not a local file URL: {}", location))
            })?;
            return Ok(Source::File(path));
        }
        Ok(Source::File(PathBuf::from(location)))
    }

    /// Read the whole resource as text.
    ///
    /// Every failure is reported as
    /// [`case_dash_core::Error::SourceUnavailable`].
    pub fn fetch(&self) -> case_dash_core::Result<String> {
        debug!("Fetching sample data from {}", self);
        match self {
            Source::File(path) => read_text(path),
            Source::Remote(url) => fetch_remote(url).map_err(|e| unavailable(url.as_str(), e)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Remote(url) => write!(f, "{}", url),
        }
    }
}

fn fetch_remote(url: &Url) -> Result<String> {
    let response = reqwest::blocking::get(url.clone())?.error_for_status()?;
    Ok(response.text()?)
}

/// Read a local file as UTF-8 text
pub fn read_text(path: &Path) -> case_dash_core::Result<String> {
    std::fs::read_to_string(path).map_err(|e| unavailable(&path.display().to_string(), e))
}

fn unavailable(name: &str, reason: impl fmt::Display) -> case_dash_core::Error {
    case_dash_core::Error::SourceUnavailable {
        source_name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_locations() {
        assert_eq!(
            Source::parse("sample-data.csv").unwrap(),
            Source::File(PathBuf::from("sample-data.csv"))
        );
        assert!(matches!(
            Source::parse("https://example.com/cases.csv").unwrap(),
            Source::Remote(_)
        ));
        assert!(Source::parse("http://").is_err());
    }

    #[test]
    fn test_fetch_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample-data.csv");
        std::fs::write(&path, "A,B\n1,2\n").unwrap();

        let text = Source::File(path).fetch().unwrap();
        assert_eq!(text, "A,B\n1,2\n");
    }

    #[test]
    fn test_fetch_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let source = Source::File(dir.path().join("missing.csv"));

        let err = source.fetch().unwrap_err();
        assert!(matches!(
            err,
            case_dash_core::Error::SourceUnavailable { .. }
        ));
    }
}
