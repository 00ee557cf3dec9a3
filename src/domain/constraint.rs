//! Version constraints as declared in a Gemfile
//!
//! Handles:
//! - Bare versions: `1.2.3` (implicit equality)
//! - Explicit equality: `= 1.2.3`
//! - Pessimistic constraints: `~> 1.2`
//! - Comparison operators: `>`, `>=`, `<`, `<=`
//!
//! Ruby allows optional whitespace between operator and version; an explicit
//! `=` is kept as written when a requirement is rewritten to a new version.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// operator, whitespace after it, version
static CONSTRAINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(~>|>=|<=|=|>|<)?(\s*)(.*?)$").unwrap());

/// Operator in front of a declared version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintOperator {
    /// No operator (`1.2.3`), implicit equality
    None,
    /// `= 1.2.3`
    Equal,
    /// `> 1.2.3`
    Greater,
    /// `>= 1.2.3`
    GreaterOrEqual,
    /// `~> 1.2`
    Pessimistic,
    /// `< 1.2.3`
    Less,
    /// `<= 1.2.3`
    LessOrEqual,
}

impl ConstraintOperator {
    fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "=" => ConstraintOperator::Equal,
            ">" => ConstraintOperator::Greater,
            ">=" => ConstraintOperator::GreaterOrEqual,
            "~>" => ConstraintOperator::Pessimistic,
            "<" => ConstraintOperator::Less,
            "<=" => ConstraintOperator::LessOrEqual,
            _ => ConstraintOperator::None,
        }
    }

    /// The operator as written in a Gemfile, if any
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            ConstraintOperator::None => None,
            ConstraintOperator::Equal => Some("="),
            ConstraintOperator::Greater => Some(">"),
            ConstraintOperator::GreaterOrEqual => Some(">="),
            ConstraintOperator::Pessimistic => Some("~>"),
            ConstraintOperator::Less => Some("<"),
            ConstraintOperator::LessOrEqual => Some("<="),
        }
    }

    /// Returns true if the operator caps the dependency below a ceiling
    pub fn is_ceiling(&self) -> bool {
        matches!(self, ConstraintOperator::Less)
    }
}

/// A declared version requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Operator kind
    pub operator: ConstraintOperator,
    /// The version number without operator
    pub version: String,
    /// The requirement as declared
    pub raw: String,
    /// Operator text including trailing whitespace, e.g. `"~> "`
    pub prefix: String,
}

impl Constraint {
    /// Parse a requirement string. Unrecognized text becomes the version.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();

        let (operator, prefix, version) = match CONSTRAINT_RE.captures(trimmed) {
            Some(caps) => {
                let symbol = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                let spacing = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                let version = caps.get(3).map(|m| m.as_str()).unwrap_or("");
                let prefix = if symbol.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", symbol, spacing)
                };
                (ConstraintOperator::from_symbol(symbol), prefix, version)
            }
            None => (ConstraintOperator::None, String::new(), trimmed),
        };

        Self {
            operator,
            version: version.to_string(),
            prefix,
            raw,
        }
    }

    /// Returns true if the requirement may be raised automatically
    pub fn is_updatable(&self) -> bool {
        !self.operator.is_ceiling()
    }

    /// Returns true if an operator was written explicitly
    pub fn has_operator(&self) -> bool {
        self.operator != ConstraintOperator::None
    }

    /// Formats `new_version` as an exact requirement.
    ///
    /// Only an explicit `=` survives; any other operator would let bundler
    /// resolve to something other than `new_version`.
    pub fn format_updated(&self, new_version: &str) -> String {
        match self.operator {
            ConstraintOperator::Equal => format!("{}{}", self.prefix, new_version),
            _ => new_version.to_string(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
