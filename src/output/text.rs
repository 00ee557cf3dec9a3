//! Text output formatter for human-readable display
//!
//! One block per gem, one line per attempted bump level, then a summary.

use crate::domain::{AttemptOutcome, GemReport, RunSummary};
use crate::output::{is_visible, OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self::with_color(verbosity, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Colorize an outcome by how it ended
    fn paint_outcome(&self, outcome: &AttemptOutcome) -> String {
        let text = outcome.to_string();
        if !self.color {
            return text;
        }
        match outcome {
            AttemptOutcome::Committed { .. } => text.green().to_string(),
            AttemptOutcome::Planned { .. } => text.cyan().to_string(),
            AttemptOutcome::NoNewerVersion | AttemptOutcome::NotUpdatable => {
                text.dimmed().to_string()
            }
            o if o.was_reverted() => text.red().to_string(),
            _ => text.yellow().to_string(),
        }
    }

    fn write_header(&self, report: &GemReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let locked = report.locked_before.as_deref().unwrap_or("-");
        let requirement = report.dependency.constraint.raw.trim();
        if self.color {
            writeln!(
                writer,
                "{} {} {}",
                report.name().bold(),
                locked.dimmed(),
                format!("[{}]", requirement).dimmed()
            )
        } else {
            writeln!(writer, "{} {} [{}]", report.name(), locked, requirement)
        }
    }

    fn write_summary(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let verb = if summary.dry_run {
            "would be updated"
        } else {
            "updated"
        };
        let upgraded = summary.upgraded_count();
        let reverted = summary.reverted_count();

        if self.color {
            let prefix = if summary.dry_run {
                format!("{} ", "(dry-run)".cyan())
            } else {
                String::new()
            };
            writeln!(
                writer,
                "{}{} of {} gems {}, {} reverted",
                prefix,
                upgraded.to_string().green().bold(),
                summary.total(),
                verb,
                if reverted > 0 {
                    reverted.to_string().red().to_string()
                } else {
                    reverted.to_string()
                }
            )
        } else {
            let prefix = if summary.dry_run { "(dry-run) " } else { "" };
            writeln!(
                writer,
                "{}{} of {} gems {}, {} reverted",
                prefix,
                upgraded,
                summary.total(),
                verb,
                reverted
            )
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        for report in &summary.gems {
            if is_visible(report, self.verbosity) {
                self.format_gem(report, writer)?;
            }
        }
        self.write_summary(summary, writer)
    }

    fn format_gem(&self, report: &GemReport, writer: &mut dyn Write) -> std::io::Result<()> {
        self.write_header(report, writer)?;
        if let Some(reason) = &report.skipped {
            writeln!(writer, "  {}", self.paint_outcome(reason))?;
        }
        for attempt in &report.attempts {
            writeln!(
                writer,
                "  {:<6} {}",
                attempt.level.as_str(),
                self.paint_outcome(&attempt.outcome)
            )?;
        }
        Ok(())
    }
}
