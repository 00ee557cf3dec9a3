//! Gem selection for a whole-Gemfile run

/// Which declared gems a run should touch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GemFilter {
    /// Gems to leave alone
    pub exclude: Vec<String>,
    /// If non-empty, only these gems are processed
    pub only: Vec<String>,
}

impl GemFilter {
    /// Create a filter that lets every gem through
    pub fn new() -> Self {
        Self::default()
    }

    /// Set gems to exclude
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Set gems to include (only list)
    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only;
        self
    }

    /// Check if a gem should be processed.
    ///
    /// The `only` list wins over `exclude` when both name the same gem.
    pub fn should_process(&self, name: &str) -> bool {
        if !self.only.is_empty() {
            return self.only.iter().any(|g| g == name);
        }
        !self.exclude.iter().any(|g| g == name)
    }
}
