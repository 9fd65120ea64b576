//! go.mod snapshot loading
//!
//! This module provides functionality to:
//! - Decode go.mod content into a [`Manifest`]
//! - Read and decode the working tree's go.mod

mod go_mod;

pub use go_mod::GoModParser;

use crate::domain::Manifest;
use crate::error::ManifestError;
use std::path::Path;

/// File name of the Go module manifest
pub const MANIFEST_FILENAME: &str = "go.mod";

/// File name of the Go module checksum database
pub const CHECKSUM_FILENAME: &str = "go.sum";

/// Decode go.mod content; `origin` names the snapshot in error messages
pub fn parse_manifest(content: &str, origin: &str) -> Result<Manifest, ManifestError> {
    GoModParser.parse(content, origin)
}

/// Read and decode a go.mod file from disk
pub fn read_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::not_found(path));
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
    parse_manifest(&content, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILENAME);
        fs::write(&path, "module example.com/m\n\nrequire ext/lib v1.0.0\n").unwrap();

        let manifest = read_manifest(&path).unwrap();
        assert_eq!(manifest.module, "example.com/m");
        assert_eq!(manifest.requirements.len(), 1);
    }

    #[test]
    fn test_read_manifest_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_manifest(&dir.path().join(MANIFEST_FILENAME)).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }

    #[test]
    fn test_read_manifest_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILENAME);
        fs::write(&path, "go 1.21\n").unwrap();

        let err = read_manifest(&path).unwrap_err();
        assert!(err.to_string().contains("go.mod"));
    }
}
