//! JSON output formatter for machine processing

use crate::domain::{GemReport, RunSummary};
use crate::output::{is_visible, OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects which gems are listed
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full run
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-gem reports
    gems: Vec<&'a GemReport>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    upgraded: usize,
    reverted: usize,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        // quiet still lists attempted gems; JSON consumers want the data
        let verbosity = match self.verbosity {
            Verbosity::Quiet => Verbosity::Normal,
            v => v,
        };
        let output = JsonOutput {
            dry_run: summary.dry_run,
            summary: JsonSummary {
                total: summary.total(),
                upgraded: summary.upgraded_count(),
                reverted: summary.reverted_count(),
            },
            gems: summary
                .gems
                .iter()
                .filter(|g| is_visible(g, verbosity))
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }

    fn format_gem(&self, report: &GemReport, writer: &mut dyn Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, report)?;
        writeln!(writer)
    }
}
