//! File system operations for rendered output

use crate::error::{Error, Result};
use std::path::Path;

/// Create directory if it doesn't exist
pub fn ensure_dir_exists(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| Error::FileWrite {
        path: dir.display().to_string(),
        source: e,
    })
}

/// Write `content` to `path`, creating parent directories as needed
pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }
    std::fs::write(path, content).map_err(|e| Error::FileWrite {
        path: path.display().to_string(),
        source: e,
    })
}

/// Remove previously written files. Files that are already gone are fine.
pub fn remove_files<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    for path in paths {
        let path = path.as_ref();
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(Error::Io(format!(
                    "Failed to remove file '{}': {}",
                    path.display(),
                    e
                )))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_remove_files() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("out/index.html");

        write_file(&nested, b"<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&nested).unwrap(), "<html></html>");

        remove_files(&[&nested]).unwrap();
        assert!(!nested.exists());

        // removing again is not an error
        remove_files(&[&nested]).unwrap();
    }
}
