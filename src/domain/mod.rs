//! Core domain models for gemup
//!
//! This module contains the fundamental types used throughout the application:
//! - Version numbers and their integer-wise ordering
//! - Declared constraints and the dependencies that carry them
//! - Bump levels (patch, minor, major)
//! - Attempt outcomes and run summaries

mod bump;
mod constraint;
mod dependency;
mod outcome;
mod summary;
mod version;

pub use bump::BumpLevel;
pub use constraint::{Constraint, ConstraintOperator};
pub use dependency::Dependency;
pub use outcome::AttemptOutcome;
pub use summary::{GemReport, LevelAttempt, RunSummary};
pub use version::{compare_versions, sort_descending, Version};
