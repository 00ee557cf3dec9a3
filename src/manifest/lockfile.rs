//! Gemfile.lock reader
//!
//! Only resolved spec lines are of interest:
//!
//! ```text
//! GEM
//!   remote: https://rubygems.org/
//!   specs:
//!     rails (3.0.0)
//!       actionpack (= 3.0.0)
//! ```
//!
//! Spec lines are indented by exactly four spaces; their requirements (six
//! spaces) are ignored. `GIT` and `PATH` sections use the same layout.

use crate::error::ManifestError;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static SPEC_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {4}(?P<name>[^\s(]+) \((?P<version>[^)]+)\)\s*$").unwrap());

/// Section headers whose specs carry resolved versions
const SPEC_SECTIONS: &[&str] = &["GEM", "GIT", "PATH"];

/// Source of the currently locked version of a gem
pub trait LockSource {
    /// Locked version for `name`, or `None` when the gem is not locked
    fn locked_version_for(&self, name: &str) -> Result<Option<String>, ManifestError>;
}

/// Parses every resolved `name (version)` spec line of a lockfile.
///
/// Platform suffixes are dropped: `nokogiri (1.15.0-x86_64-linux)` locks `1.15.0`.
pub fn parse_locked_versions(content: &str) -> BTreeMap<String, String> {
    let mut versions = BTreeMap::new();
    let mut in_spec_section = false;

    for line in content.lines() {
        if !line.starts_with(' ') {
            in_spec_section = SPEC_SECTIONS.contains(&line.trim());
            continue;
        }
        if !in_spec_section {
            continue;
        }
        if let Some(caps) = SPEC_LINE_RE.captures(line) {
            let name = caps["name"].to_string();
            let version = strip_platform(&caps["version"]).to_string();
            versions.entry(name).or_insert(version);
        }
    }

    versions
}

fn strip_platform(version: &str) -> &str {
    version.split('-').next().unwrap_or(version)
}

/// Lockfile on disk, re-read on every query
pub struct FileLockSource {
    path: PathBuf,
}

impl FileLockSource {
    /// Creates a lock source for the given Gemfile.lock path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the lockfile
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LockSource for FileLockSource {
    fn locked_version_for(&self, name: &str) -> Result<Option<String>, ManifestError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ManifestError::lock_read_error(&self.path, e)),
        };
        Ok(parse_locked_versions(&content).remove(name))
    }
}
