//! Progress display for a run
//!
//! A spinner covers the working-tree check, then a bar counts through the
//! selected gems. indicatif draws on stderr, away from the report on stdout.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(90);

/// Terminal feedback while gems are tried one by one
pub struct Progress {
    enabled: bool,
    current: Option<ProgressBar>,
}

impl Progress {
    /// `enabled` is false for quiet and JSON runs; every call is then a no-op.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            current: None,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Indeterminate step, e.g. querying git
    pub fn spinner(&mut self, message: &str) {
        self.show(ProgressBar::new_spinner(), "{spinner:.cyan} {msg}", message);
    }

    /// Bar over `gems` items
    pub fn start(&mut self, gems: u64, message: &str) {
        self.show(
            ProgressBar::new(gems),
            "{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}",
            message,
        );
    }

    pub fn inc(&self) {
        if let Some(bar) = &self.current {
            bar.inc(1);
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.current {
            bar.set_message(message.to_string());
        }
    }

    /// Remove whatever is drawn so the report starts on a clean line
    pub fn finish_and_clear(&mut self) {
        if let Some(bar) = self.current.take() {
            bar.finish_and_clear();
        }
    }

    fn show(&mut self, bar: ProgressBar, template: &str, message: &str) {
        if !self.enabled {
            return;
        }
        // templates are constants above; a bad one is a programming error
        let style = ProgressStyle::with_template(template)
            .expect("progress template")
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(TICK);
        if let Some(previous) = self.current.replace(bar) {
            previous.finish_and_clear();
        }
    }
}
