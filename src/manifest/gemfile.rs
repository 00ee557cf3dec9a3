//! Gemfile parser and in-place patcher
//!
//! Handles:
//! - `gem` declarations with an optional quoted version literal
//! - Trailing option clauses (`:git => ...`, `require: false`, extra requirements)
//! - Pass-through of everything else (groups, sources, comments) untouched
//!
//! Patching rewrites only the characters of the version literal, so quoting
//! style, spacing, options and line endings survive byte-for-byte.

use crate::domain::{Constraint, Dependency};
use crate::error::ManifestError;
use crate::manifest::ManifestStore;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

// gem 'name' [, 'version'] [, options] [# comment]
static GEM_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*gem\s+(?:'(?P<sq_name>[^']+)'|"(?P<dq_name>[^"]+)")(?:\s*,\s*(?:'(?P<sq_ver>[^']*)'|"(?P<dq_ver>[^"]*)"))?(?:\s*,\s*(?P<options>.*?))?(?:\s*#.*)?\s*$"#,
    )
    .unwrap()
});

/// A single `gem` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GemEntry {
    /// Gem name
    pub name: String,
    /// Declared version literal, if any
    pub version: Option<String>,
    /// Raw text of the trailing options clause, if any
    pub options: Option<String>,
    /// The source line without its line terminator
    pub raw: String,
    /// Zero-based line number in the Gemfile
    pub line: usize,
    name_quote: char,
    name_end: usize,
    version_span: Option<Range<usize>>,
}

impl GemEntry {
    fn from_line(line_no: usize, raw: &str) -> Option<Self> {
        let caps = GEM_LINE_RE.captures(raw)?;

        let (name_match, name_quote) = match (caps.name("sq_name"), caps.name("dq_name")) {
            (Some(m), _) => (m, '\''),
            (None, Some(m)) => (m, '"'),
            (None, None) => return None,
        };
        let version_match = caps.name("sq_ver").or_else(|| caps.name("dq_ver"));
        let options = caps
            .name("options")
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Some(Self {
            name: name_match.as_str().to_string(),
            version: version_match.map(|m| m.as_str().to_string()),
            options,
            raw: raw.to_string(),
            line: line_no,
            name_quote,
            // closing quote follows the name
            name_end: name_match.end() + 1,
            version_span: version_match.map(|m| m.range()),
        })
    }

    /// Re-serializes the entry. Untouched entries reproduce their source line.
    pub fn to_line(&self) -> &str {
        &self.raw
    }

    /// The declaration as a dependency (empty requirement when unversioned)
    pub fn to_dependency(&self) -> Dependency {
        Dependency::new(&self.name, self.version.clone().unwrap_or_default())
    }

    /// Produces the line with the version literal replaced by `requirement`
    fn patched_line(&self, requirement: &str) -> String {
        match &self.version_span {
            Some(span) => format!(
                "{}{}{}",
                &self.raw[..span.start],
                requirement,
                &self.raw[span.end..]
            ),
            None => format!(
                "{}, {q}{}{q}{}",
                &self.raw[..self.name_end],
                requirement,
                &self.raw[self.name_end..],
                q = self.name_quote
            ),
        }
    }
}

/// A parsed Gemfile with its full raw text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GemfileDocument {
    content: String,
    entries: Vec<GemEntry>,
}

impl GemfileDocument {
    /// Parses Gemfile text. Lines that are not gem declarations are ignored.
    pub fn parse(content: impl Into<String>) -> Self {
        let content = content.into();
        let entries = content
            .split_inclusive('\n')
            .enumerate()
            .filter_map(|(line_no, line)| GemEntry::from_line(line_no, strip_line_ending(line)))
            .collect();

        Self { content, entries }
    }

    /// Reads and parses the Gemfile from a store
    pub fn load(store: &dyn ManifestStore) -> Result<Self, ManifestError> {
        Ok(Self::parse(store.read_manifest()?))
    }

    /// Gem declarations in file order
    pub fn entries(&self) -> &[GemEntry] {
        &self.entries
    }

    /// Finds a declaration by gem name
    pub fn find(&self, name: &str) -> Option<&GemEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// The full Gemfile text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Rewrites the version literal of `dependency.name` in memory.
    ///
    /// A bare version pins the gem exactly: the declared operator is dropped
    /// (`'~> 0.9'` patched to `0.9.2` becomes `'0.9.2'`) unless it is `=`.
    pub fn patch_gem(&mut self, dependency: &Dependency) -> Result<&mut Self, ManifestError> {
        let entry = self
            .find(&dependency.name)
            .ok_or_else(|| ManifestError::unknown_dependency(&dependency.name))?;

        let requirement = match &entry.version {
            Some(declared) if !dependency.constraint.has_operator() => {
                Constraint::parse(declared.as_str()).format_updated(dependency.version())
            }
            _ => dependency.constraint.raw.trim().to_string(),
        };
        let target_line = entry.line;
        let new_line = entry.patched_line(&requirement);

        let mut patched = String::with_capacity(self.content.len() + requirement.len());
        for (line_no, line) in self.content.split_inclusive('\n').enumerate() {
            if line_no == target_line {
                let body = strip_line_ending(line);
                patched.push_str(&new_line);
                patched.push_str(&line[body.len()..]);
            } else {
                patched.push_str(line);
            }
        }

        *self = Self::parse(patched);
        Ok(self)
    }

    /// Patches the version literal and persists the Gemfile
    pub fn update_gem(
        &mut self,
        dependency: &Dependency,
        store: &dyn ManifestStore,
    ) -> Result<&mut Self, ManifestError> {
        self.patch_gem(dependency)?;
        store.write_manifest(&self.content)?;
        Ok(self)
    }
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
