//! Version information from registry
//!
//! A published gem version with its release date and prerelease flag.

use crate::domain::compare_versions;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Information about a gem version from the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// The version number (e.g., "3.0.1")
    pub version: String,
    /// When this version was released
    pub released_at: DateTime<Utc>,
    /// Whether the registry flags this version as a prerelease
    #[serde(default)]
    pub prerelease: bool,
}

impl VersionInfo {
    /// Create a new VersionInfo
    pub fn new(version: impl Into<String>, released_at: DateTime<Utc>) -> Self {
        Self {
            version: version.into(),
            released_at,
            prerelease: false,
        }
    }

    /// Create a VersionInfo with current time as release date
    pub fn now(version: impl Into<String>) -> Self {
        Self::new(version, Utc::now())
    }

    /// Set the prerelease flag
    pub fn with_prerelease(mut self, prerelease: bool) -> Self {
        self.prerelease = prerelease;
        self
    }

    /// Returns true if this version was released at least `min_age` before `now`
    pub fn is_older_than(&self, min_age: Duration, now: DateTime<Utc>) -> bool {
        self.released_at <= now - min_age
    }
}

impl Ord for VersionInfo {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        compare_versions(&self.version, &other.version)
    }
}

impl PartialOrd for VersionInfo {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
