//! Run summary types
//!
//! Provides structures for tracking attempts at gem and overall levels.

use super::{AttemptOutcome, BumpLevel, Dependency};
use serde::{Deserialize, Serialize};

/// One bump level attempted for a gem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelAttempt {
    /// Level that was attempted
    pub level: BumpLevel,
    /// What happened
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// All attempts made for a single gem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemReport {
    /// The gem as declared before the run
    pub dependency: Dependency,
    /// Locked version before the run, if any
    pub locked_before: Option<String>,
    /// Attempts in the order they were made
    pub attempts: Vec<LevelAttempt>,
    /// Set when the gem was never attempted (e.g. pinned below a ceiling)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<AttemptOutcome>,
}

impl GemReport {
    /// Creates an empty report
    pub fn new(dependency: Dependency) -> Self {
        Self {
            dependency,
            locked_before: None,
            attempts: Vec::new(),
            skipped: None,
        }
    }

    /// Creates a report for a gem that was not attempted at all
    pub fn skipped(dependency: Dependency, reason: AttemptOutcome) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::new(dependency)
        }
    }

    /// Records the outcome of one level
    pub fn record(&mut self, level: BumpLevel, outcome: AttemptOutcome) {
        self.attempts.push(LevelAttempt { level, outcome });
    }

    /// Returns the gem name
    pub fn name(&self) -> &str {
        &self.dependency.name
    }

    /// Returns true if at least one level succeeded
    pub fn upgraded(&self) -> bool {
        self.attempts.iter().any(|a| a.outcome.is_success())
    }

    /// Version reached by the last successful level
    pub fn final_version(&self) -> Option<&str> {
        self.attempts
            .iter()
            .rev()
            .find(|a| a.outcome.is_success())
            .and_then(|a| a.outcome.target())
    }

    /// Returns true if any attempt had to be reverted
    pub fn has_reverts(&self) -> bool {
        self.attempts.iter().any(|a| a.outcome.was_reverted())
    }
}

/// Overall summary of a run over a Gemfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Reports per gem, in Gemfile order
    pub gems: Vec<GemReport>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            gems: Vec::new(),
            dry_run,
        }
    }

    /// Adds a gem report
    pub fn add(&mut self, report: GemReport) {
        self.gems.push(report);
    }

    /// Number of gems that moved forward
    pub fn upgraded_count(&self) -> usize {
        self.gems.iter().filter(|g| g.upgraded()).count()
    }

    /// Number of gems with at least one reverted attempt
    pub fn reverted_count(&self) -> usize {
        self.gems.iter().filter(|g| g.has_reverts()).count()
    }

    /// Number of gems processed
    pub fn total(&self) -> usize {
        self.gems.len()
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new(false)
    }
}
