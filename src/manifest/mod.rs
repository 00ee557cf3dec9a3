//! Gemfile and Gemfile.lock access
//!
//! This module provides functionality to:
//! - Read and write the Gemfile through a narrow store interface
//! - Parse gem declarations and patch version literals in place
//! - Query locked versions from Gemfile.lock

mod gemfile;
mod lockfile;

pub use gemfile::{GemEntry, GemfileDocument};
pub use lockfile::{parse_locked_versions, FileLockSource, LockSource};

use crate::error::ManifestError;
use std::fs;
use std::path::{Path, PathBuf};

/// Read/write access to the manifest text
pub trait ManifestStore {
    /// Path of the manifest, as used for VCS operations
    fn path(&self) -> &Path;

    /// Read the full manifest text
    fn read_manifest(&self) -> Result<String, ManifestError>;

    /// Replace the manifest text
    fn write_manifest(&self, content: &str) -> Result<(), ManifestError>;
}

/// Manifest stored on the local filesystem
#[derive(Debug, Clone)]
pub struct FileManifestStore {
    path: PathBuf,
}

impl FileManifestStore {
    /// Creates a store for the given Gemfile path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ManifestStore for FileManifestStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_manifest(&self) -> Result<String, ManifestError> {
        fs::read_to_string(&self.path).map_err(|e| ManifestError::read_error(&self.path, e))
    }

    fn write_manifest(&self, content: &str) -> Result<(), ManifestError> {
        fs::write(&self.path, content).map_err(|e| ManifestError::write_error(&self.path, e))
    }
}
