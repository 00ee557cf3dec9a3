//! Attempt outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened when a single bump level was attempted.
///
/// Every soft failure of the update cycle lands here instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Manifest and lockfile were updated, tests passed and the change was committed
    Committed { from: String, to: String },
    /// Dry run: an update would be attempted
    Planned { from: String, to: String },
    /// The requirement is capped below a ceiling
    NotUpdatable,
    /// The gem has no entry in the lockfile
    NoLockedVersion,
    /// No newer version exists at this level
    NoNewerVersion,
    /// The selected candidate is older than the locked version
    CandidateBelowLock { candidate: String, locked: String },
    /// The version index could not be queried
    FetchFailed { message: String },
    /// Dependency re-resolution failed; changes were reverted
    ResolutionFailed { candidate: String },
    /// The test suite failed; changes were reverted
    TestsFailed { candidate: String },
    /// Committing failed; changes were reverted
    CommitFailed { candidate: String },
}

impl AttemptOutcome {
    /// Returns true if the attempt moved the gem forward (or would, in a dry run)
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            AttemptOutcome::Committed { .. } | AttemptOutcome::Planned { .. }
        )
    }

    /// Returns true if the working tree was touched and then reverted
    pub fn was_reverted(&self) -> bool {
        matches!(
            self,
            AttemptOutcome::ResolutionFailed { .. }
                | AttemptOutcome::TestsFailed { .. }
                | AttemptOutcome::CommitFailed { .. }
        )
    }

    /// Target version, when one was selected
    pub fn target(&self) -> Option<&str> {
        match self {
            AttemptOutcome::Committed { to, .. } | AttemptOutcome::Planned { to, .. } => Some(to),
            AttemptOutcome::CandidateBelowLock { candidate, .. }
            | AttemptOutcome::ResolutionFailed { candidate }
            | AttemptOutcome::TestsFailed { candidate }
            | AttemptOutcome::CommitFailed { candidate } => Some(candidate),
            _ => None,
        }
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Committed { from, to } => write!(f, "updated {} -> {}", from, to),
            AttemptOutcome::Planned { from, to } => write!(f, "would update {} -> {}", from, to),
            AttemptOutcome::NotUpdatable => write!(f, "pinned below a ceiling"),
            AttemptOutcome::NoLockedVersion => write!(f, "not found in lockfile"),
            AttemptOutcome::NoNewerVersion => write!(f, "already at latest"),
            AttemptOutcome::CandidateBelowLock { candidate, locked } => {
                write!(f, "candidate {} is below locked {}", candidate, locked)
            }
            AttemptOutcome::FetchFailed { message } => write!(f, "fetch failed: {}", message),
            AttemptOutcome::ResolutionFailed { candidate } => {
                write!(f, "could not resolve {} (reverted)", candidate)
            }
            AttemptOutcome::TestsFailed { candidate } => {
                write!(f, "tests failed with {} (reverted)", candidate)
            }
            AttemptOutcome::CommitFailed { candidate } => {
                write!(f, "commit failed for {} (reverted)", candidate)
            }
        }
    }
}
