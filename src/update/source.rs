//! Candidate versions for a gem
//!
//! Retrieval is delegated to a [`VersionIndex`]; this layer only filters
//! and orders what the index returns.

use super::VersionInfo;
use crate::domain::sort_descending;
use crate::error::RegistryError;
use crate::registry::VersionIndex;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;

/// Published versions of a gem, filtered by release policy
pub struct VersionSource<'a> {
    index: &'a dyn VersionIndex,
    include_prerelease: bool,
    min_age: Option<Duration>,
    now: DateTime<Utc>,
}

impl<'a> VersionSource<'a> {
    /// Create a source over `index` that skips prereleases
    pub fn new(index: &'a dyn VersionIndex) -> Self {
        Self {
            index,
            include_prerelease: false,
            min_age: None,
            now: Utc::now(),
        }
    }

    /// Whether prerelease versions are candidates
    pub fn with_include_prerelease(mut self, include: bool) -> Self {
        self.include_prerelease = include;
        self
    }

    /// Only consider versions released at least `min_age` ago
    pub fn with_min_age(mut self, min_age: Option<Duration>) -> Self {
        self.min_age = min_age;
        self
    }

    /// Reference time for `min_age`
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    fn accepts(&self, info: &VersionInfo) -> bool {
        if info.prerelease && !self.include_prerelease {
            return false;
        }
        match self.min_age {
            Some(age) => info.is_older_than(age, self.now),
            None => true,
        }
    }

    /// Available versions of `name`, highest first, without duplicates
    pub async fn available_versions_for(&self, name: &str) -> Result<Vec<String>, RegistryError> {
        let fetched = self.index.fetch_versions(name).await?;
        let total = fetched.len();

        let mut seen = BTreeSet::new();
        let kept: Vec<String> = fetched
            .into_iter()
            .filter(|info| self.accepts(info))
            .map(|info| info.version)
            .filter(|v| seen.insert(v.clone()))
            .collect();

        tracing::debug!(
            gem = name,
            registry = self.index.registry_name(),
            total,
            kept = kept.len(),
            "filtered available versions"
        );
        Ok(sort_descending(kept))
    }
}
