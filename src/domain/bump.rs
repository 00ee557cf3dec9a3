//! Bump levels: how far an update may move away from the current version

use super::Version;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of a version increment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    /// Same major and minor segment
    Patch,
    /// Same major segment
    Minor,
    /// Any newer version
    Major,
}

impl BumpLevel {
    /// All levels in the order they are attempted
    pub fn all() -> &'static [BumpLevel] {
        &[BumpLevel::Patch, BumpLevel::Minor, BumpLevel::Major]
    }

    /// Levels from patch up to and including `max`
    pub fn up_to(max: BumpLevel) -> Vec<BumpLevel> {
        Self::all().iter().copied().filter(|l| *l <= max).collect()
    }

    /// Returns true if `candidate` is newer than `baseline` and within this level
    pub fn accepts(&self, baseline: &Version, candidate: &Version) -> bool {
        if candidate <= baseline {
            return false;
        }
        match self {
            BumpLevel::Patch => {
                candidate.segment(0) == baseline.segment(0)
                    && candidate.segment(1) == baseline.segment(1)
            }
            BumpLevel::Minor => candidate.segment(0) == baseline.segment(0),
            BumpLevel::Major => true,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpLevel::Patch => "patch",
            BumpLevel::Minor => "minor",
            BumpLevel::Major => "major",
        }
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BumpLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patch" => Ok(BumpLevel::Patch),
            "minor" => Ok(BumpLevel::Minor),
            "major" => Ok(BumpLevel::Major),
            _ => Err(ConfigError::InvalidBumpLevel {
                value: s.to_string(),
            }),
        }
    }
}
