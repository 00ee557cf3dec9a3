//! Dependency information structures

use super::{Constraint, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A gem declared in the Gemfile together with its requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Gem name
    pub name: String,
    /// Declared version requirement
    pub constraint: Constraint,
}

impl Dependency {
    /// Creates a new dependency from a gem name and its requirement string
    pub fn new(name: impl Into<String>, requirement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: Constraint::parse(requirement),
        }
    }

    /// Returns true unless the requirement is pinned below a ceiling
    pub fn is_updatable(&self) -> bool {
        self.constraint.is_updatable()
    }

    /// Returns the declared version number (without operator)
    pub fn version(&self) -> &str {
        &self.constraint.version
    }

    /// Returns the declared version as a comparable value
    pub fn parsed_version(&self) -> Version {
        Version::parse(self.version())
    }

    /// Major segment of the declared version, if present
    pub fn major(&self) -> Option<&str> {
        self.segment(0)
    }

    /// Minor segment of the declared version, if present
    pub fn minor(&self) -> Option<&str> {
        self.segment(1)
    }

    /// Patch segment of the declared version, if present
    pub fn patch(&self) -> Option<&str> {
        self.segment(2)
    }

    fn segment(&self, index: usize) -> Option<&str> {
        let version = self.version();
        if version.is_empty() {
            return None;
        }
        version.split('.').nth(index)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraint.raw.trim().is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.constraint)
        }
    }
}
