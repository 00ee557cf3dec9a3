//! Per-gem incremental update engine
//!
//! This module provides:
//! - Gem filter configuration for whole-Gemfile runs
//! - Version info from the registry and the filtered version source
//! - `GemUpdater`, which moves one gem forward one bump level at a time:
//!   patch the Gemfile, re-resolve, run the tests, then commit or revert

mod filter;
mod source;
mod version_info;

pub use filter::GemFilter;
pub use source::VersionSource;
pub use version_info::VersionInfo;

use crate::config::UpdaterConfig;
use crate::domain::{AttemptOutcome, BumpLevel, Dependency, GemReport, Version};
use crate::error::{AppError, ManifestError, RegistryError};
use crate::manifest::{GemfileDocument, LockSource, ManifestStore};
use crate::shell::{resolve_dependency, ShellRunner};
use crate::vcs::Vcs;
use std::cmp::Ordering;
use std::path::Path;

/// Everything outside the engine that an update touches
pub struct Collaborators<'a> {
    pub manifest: &'a dyn ManifestStore,
    pub lock: &'a dyn LockSource,
    pub versions: VersionSource<'a>,
    pub shell: &'a dyn ShellRunner,
    pub vcs: &'a dyn Vcs,
}

/// Highest version in `available` that is newer than `baseline` within `level`.
///
/// `available` must be sorted highest first. Returns `baseline` itself when
/// nothing qualifies.
pub fn pick_candidate(level: BumpLevel, baseline: &str, available: &[String]) -> String {
    let base = Version::parse(baseline);
    available
        .iter()
        .find(|candidate| level.accepts(&base, &Version::parse(candidate.as_str())))
        .cloned()
        .unwrap_or_else(|| baseline.to_string())
}

/// Drives a single gem through the update cycle
pub struct GemUpdater<'a> {
    dependency: Dependency,
    collaborators: &'a Collaborators<'a>,
    config: &'a UpdaterConfig,
}

impl<'a> GemUpdater<'a> {
    pub fn new(
        dependency: Dependency,
        collaborators: &'a Collaborators<'a>,
        config: &'a UpdaterConfig,
    ) -> Self {
        Self {
            dependency,
            collaborators,
            config,
        }
    }

    /// The gem being updated
    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    fn name(&self) -> &str {
        &self.dependency.name
    }

    /// Published versions of the gem, highest first
    pub async fn available_versions(&self) -> Result<Vec<String>, RegistryError> {
        self.collaborators
            .versions
            .available_versions_for(self.name())
            .await
    }

    /// Currently locked version, read fresh from the lockfile
    pub fn locked_version(&self) -> Result<Option<String>, ManifestError> {
        self.collaborators.lock.locked_version_for(self.name())
    }

    /// Best candidate at `level`, or the baseline when there is none.
    ///
    /// The baseline is the locked version, falling back to the declared one.
    pub async fn last_version(&self, level: BumpLevel) -> Result<String, AppError> {
        let available = self.available_versions().await?;
        let baseline = match self.locked_version()? {
            Some(locked) => locked,
            None => self.dependency.version().to_string(),
        };
        Ok(pick_candidate(level, &baseline, &available))
    }

    /// Attempt a single bump level and report what happened.
    ///
    /// Only manifest and lockfile access failures are errors. Every other
    /// failure leaves the working tree as it was and becomes an outcome.
    pub async fn attempt(&self, level: BumpLevel) -> Result<AttemptOutcome, AppError> {
        if !self.dependency.is_updatable() {
            tracing::debug!(gem = self.name(), "pinned below a ceiling, not updatable");
            return Ok(AttemptOutcome::NotUpdatable);
        }

        let Some(locked) = self.locked_version()? else {
            tracing::debug!(gem = self.name(), "no locked version");
            return Ok(AttemptOutcome::NoLockedVersion);
        };

        let candidate = match self.last_version(level).await {
            Ok(candidate) => candidate,
            Err(AppError::Registry(e)) => {
                tracing::warn!(gem = self.name(), error = %e, "could not fetch versions");
                return Ok(AttemptOutcome::FetchFailed {
                    message: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        match crate::domain::compare_versions(&candidate, &locked) {
            Ordering::Equal => {
                tracing::debug!(gem = self.name(), %level, version = %locked, "no newer version");
                return Ok(AttemptOutcome::NoNewerVersion);
            }
            Ordering::Less => {
                tracing::warn!(gem = self.name(), %candidate, %locked, "candidate below locked version");
                return Ok(AttemptOutcome::CandidateBelowLock { candidate, locked });
            }
            Ordering::Greater => {}
        }

        if self.config.dry_run {
            return Ok(AttemptOutcome::Planned {
                from: locked,
                to: candidate,
            });
        }

        tracing::debug!(gem = self.name(), %level, from = %locked, to = %candidate, "updating");
        if !self.update_gemfile(&candidate)? {
            tracing::warn!(gem = self.name(), %candidate, "bundle could not be resolved, reverting");
            self.revert_to_previous_version();
            return Ok(AttemptOutcome::ResolutionFailed { candidate });
        }

        if !self.run_test_suite() {
            tracing::warn!(gem = self.name(), %candidate, "tests failed, reverting");
            self.revert_to_previous_version();
            return Ok(AttemptOutcome::TestsFailed { candidate });
        }

        if !self.commit_new_version(&candidate) {
            tracing::warn!(gem = self.name(), %candidate, "commit failed, reverting");
            self.revert_to_previous_version();
            return Ok(AttemptOutcome::CommitFailed { candidate });
        }

        tracing::info!(gem = self.name(), from = %locked, to = %candidate, "committed update");
        Ok(AttemptOutcome::Committed {
            from: locked,
            to: candidate,
        })
    }

    /// Attempt a single bump level; true when the gem moved forward
    pub async fn update(&self, level: BumpLevel) -> Result<bool, AppError> {
        Ok(self.attempt(level).await?.is_success())
    }

    /// Attempt patch, minor and major in turn, stopping at the first failure
    pub async fn auto_update(&self) -> Result<GemReport, AppError> {
        self.auto_update_levels(BumpLevel::all()).await
    }

    /// Attempt `levels` in order, stopping at the first one that does not succeed
    pub async fn auto_update_levels(&self, levels: &[BumpLevel]) -> Result<GemReport, AppError> {
        if !self.dependency.is_updatable() {
            return Ok(GemReport::skipped(
                self.dependency.clone(),
                AttemptOutcome::NotUpdatable,
            ));
        }

        let mut report = GemReport::new(self.dependency.clone());
        report.locked_before = self.locked_version()?;

        for &level in levels {
            let outcome = self.attempt(level).await?;
            let moved = outcome.is_success();
            report.record(level, outcome);
            if !moved {
                break;
            }
        }
        Ok(report)
    }

    /// Pin `version` in the Gemfile and re-resolve the bundle.
    ///
    /// The Gemfile is re-read first so edits from earlier attempts (or their
    /// reverts) are never overwritten with stale content.
    pub fn update_gemfile(&self, version: &str) -> Result<bool, ManifestError> {
        let store = self.collaborators.manifest;
        let mut document = GemfileDocument::load(store)?;
        document.update_gem(&Dependency::new(self.name(), version), store)?;
        Ok(resolve_dependency(
            self.collaborators.shell,
            self.config,
            self.name(),
        ))
    }

    /// Run the configured test command; no command counts as passing
    pub fn run_test_suite(&self) -> bool {
        let command = self.config.test_command.trim();
        if command.is_empty() {
            return true;
        }
        self.collaborators.shell.run(command)
    }

    /// Commit the Gemfile and lockfile
    pub fn commit_new_version(&self, version: &str) -> bool {
        let message = self.config.commit_message(self.name(), version);
        self.collaborators
            .vcs
            .commit(&[self.manifest_path(), self.lock_path()], &message)
    }

    /// Restore the last committed Gemfile, and the lockfile when it changed
    pub fn revert_to_previous_version(&self) -> bool {
        let vcs = self.collaborators.vcs;
        let manifest = self.manifest_path();
        let lock = self.lock_path();

        let reverted = match vcs.status() {
            Ok(status) if status.is_modified(lock) => vcs.checkout(&[manifest, lock]),
            Ok(_) => vcs.checkout(&[manifest]),
            Err(e) => {
                tracing::warn!(error = %e, "status unavailable, reverting files one by one");
                let manifest_ok = vcs.checkout(&[manifest]);
                let lock_ok = vcs.checkout(&[lock]);
                manifest_ok && lock_ok
            }
        };
        if !reverted {
            tracing::warn!(gem = self.name(), "revert did not complete cleanly");
        }
        reverted
    }

    fn manifest_path(&self) -> &Path {
        self.collaborators.manifest.path()
    }

    fn lock_path(&self) -> &Path {
        &self.config.lock_path
    }
}
