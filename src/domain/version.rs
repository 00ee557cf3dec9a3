//! Dotted version numbers and their ordering
//!
//! Versions are compared segment by segment as integers:
//! - `3.10.0` is greater than `3.9.1`
//! - missing trailing segments count as zero (`1.0` == `1.0.0`)
//! - non-numeric segments count as zero (`4.0.0.rc1` == `4.0.0`)
//! - all-digit segments too large for u64 saturate to `u64::MAX`

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A version string split into integer segments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    /// The version exactly as it was given
    pub raw: String,
    /// Integer value of each dot-separated segment
    pub segments: Vec<u64>,
}

impl Version {
    /// Parse a dotted version string. Never fails.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = parse_segments(&raw);
        Self { raw, segments }
    }

    /// Integer value of the nth segment, zero when absent
    pub fn segment(&self, index: usize) -> u64 {
        self.segments.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_segments(&self.segments, &other.segments)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn parse_segments(raw: &str) -> Vec<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('.')
        .map(parse_segment)
        .collect()
}

fn parse_segment(part: &str) -> u64 {
    let part = part.trim();
    match part.parse() {
        Ok(n) => n,
        Err(_) if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) => u64::MAX,
        Err(_) => 0,
    }
}

fn compare_segments(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let sa = a.get(i).copied().unwrap_or(0);
        let sb = b.get(i).copied().unwrap_or(0);
        match sa.cmp(&sb) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Compare two version strings segment-wise as integers
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    compare_segments(&parse_segments(a), &parse_segments(b))
}

/// Sort version strings from highest to lowest.
///
/// The sort is stable; equal versions keep no particular relative order.
pub fn sort_descending<I, S>(versions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut sorted: Vec<String> = versions.into_iter().map(Into::into).collect();
    sorted.sort_by(|a, b| compare_versions(b, a));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_numeric_not_lexical() {
        assert_eq!(compare_versions("3.10.0", "3.9.1"), Ordering::Greater);
        assert_eq!(compare_versions("3.9.1", "3.10.0"), Ordering::Less);
        assert_eq!(compare_versions("10.0.0", "9.99.99"), Ordering::Greater);
    }

    #[test]
    fn test_oversized_segment_saturates() {
        let huge = "99999999999999999999";
        assert_eq!(Version::parse(format!("{huge}.0")).segments, vec![u64::MAX, 0]);
        assert_eq!(compare_versions(&format!("{huge}.0"), "1.0"), Ordering::Greater);
        assert_eq!(compare_versions(&format!("1.{huge}"), "1.18446744073709551614"), Ordering::Greater);
        assert_eq!(Version::parse("1.rc1").segments, vec![1, 0]);
    }

    #[test]
    fn test_compare_equal() {
        assert_eq!(compare_versions("1.2.3", "1.2.3"), Ordering::Equal);
    }

    #[test]
    fn test_compare_missing_segments_are_zero() {
        assert_eq!(compare_versions("1.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("1", "1.0.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("0.9.4", "0.9.4.1"), Ordering::Less);
    }

    #[test]
    fn test_compare_non_numeric_segment_is_zero() {
        assert_eq!(compare_versions("4.0.0.rc1", "4.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.x.5", "1.0.5"), Ordering::Equal);
    }

    #[test]
    fn test_compare_antisymmetric() {
        let samples = ["0.8.0", "0.9.4.1", "1.0", "2.1.1", "2.3.14", "3.0.10", "3.10.0"];
        for a in samples {
            for b in samples {
                assert_eq!(compare_versions(a, b), compare_versions(b, a).reverse());
            }
        }
    }

    #[test]
    fn test_version_segment_accessor() {
        let v = Version::parse("2.1");
        assert_eq!(v.segment(0), 2);
        assert_eq!(v.segment(1), 1);
        assert_eq!(v.segment(2), 0);
    }

    #[test]
    fn test_version_ord_and_display() {
        let a = Version::parse("3.10.0");
        let b = Version::parse("3.9.1");
        assert!(a > b);
        assert_eq!(Version::parse("1.0"), Version::parse("1.0.0"));
        assert_eq!(a.to_string(), "3.10.0");
    }

    #[test]
    fn test_sort_descending() {
        let sorted = sort_descending(["3.9.1", "3.10.0", "3.0.0", "4.1.1", "3.9.0"]);
        assert_eq!(sorted, vec!["4.1.1", "3.10.0", "3.9.1", "3.9.0", "3.0.0"]);
    }

    #[test]
    fn test_sort_descending_keeps_duplicates() {
        let sorted = sort_descending(vec!["1.0.0".to_string(), "2.0.0".into(), "1.0.0".into()]);
        assert_eq!(sorted, vec!["2.0.0", "1.0.0", "1.0.0"]);
    }

    #[test]
    fn test_empty_version() {
        let v = Version::parse("");
        assert!(v.segments.is_empty());
        assert_eq!(compare_versions("", "0.0.0"), Ordering::Equal);
    }
}
