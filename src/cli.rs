//! CLI argument parsing module for gemup

use crate::config::parse_duration;
use crate::domain::BumpLevel;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Incremental Gemfile updater: one gem, one bump level, one commit at a time
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gemup",
    version,
    about = "Update Gemfile dependencies one verified step at a time"
)]
pub struct CliArgs {
    /// Project directory containing the Gemfile (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Test command run after each update; remaining words are joined (e.g. -c rake test)
    #[arg(short = 'c', long = "command", num_args = 1..)]
    pub command: Vec<String>,

    // General options
    /// Dry run mode - show what would be updated without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Gem filters
    /// Exclude specific gems from update (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Update only specific gems (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    /// Largest bump level to attempt
    #[arg(long, value_enum)]
    pub max_level: Option<BumpLevel>,

    /// Consider prerelease versions as update candidates
    #[arg(long)]
    pub include_prerelease: bool,

    // Age filter
    /// Only update to versions released at least this long ago (e.g., 2w, 10d, 1m)
    #[arg(long, value_parser = parse_duration)]
    pub age: Option<Duration>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Test command with its words joined by single spaces, if one was given
    pub fn test_command(&self) -> Option<String> {
        if self.command.is_empty() {
            None
        } else {
            Some(self.command.join(" "))
        }
    }
}
