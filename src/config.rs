//! Run configuration
//!
//! Everything the updater needs from its surroundings is resolved here once:
//! command-line flags, the optional `.gemup.toml` project file and the fixed
//! Bundler conventions. The engine never reads the working directory or the
//! environment on its own.

use crate::cli::CliArgs;
use crate::domain::BumpLevel;
use crate::error::ConfigError;
use crate::update::GemFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the optional per-project configuration file
pub const PROJECT_CONFIG_FILE: &str = ".gemup.toml";

/// Environment variables removed before spawning child processes.
///
/// A parent `bundle exec` leaks these and would point child Bundler
/// invocations at the wrong Gemfile.
pub const CLEARED_ENV: &[&str] = &["RUBYOPT", "BUNDLE_BIN_PATH", "BUNDLE_GEMFILE"];

const DEFAULT_COMMIT_TEMPLATE: &str = "Auto update {name} to version {version}";

/// Parse duration string in format: Nd (days), Nw (weeks), Nm (months)
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        value: s.to_string(),
    };
    let trimmed = s.trim();

    let (num_str, days_per_unit) = if let Some(n) = trimmed.strip_suffix('d') {
        (n, 1)
    } else if let Some(n) = trimmed.strip_suffix('w') {
        (n, 7)
    } else if let Some(n) = trimmed.strip_suffix('m') {
        (n, 30)
    } else {
        return Err(invalid());
    };

    let num: u64 = num_str.parse().map_err(|_| invalid())?;
    Ok(Duration::from_secs(num * days_per_unit * 24 * 60 * 60))
}

/// Configuration handed to the per-gem update engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    /// Directory every child process runs in
    pub project_dir: PathBuf,
    /// Path of the Gemfile
    pub manifest_path: PathBuf,
    /// Path of the Gemfile.lock
    pub lock_path: PathBuf,
    /// Test command; empty means no tests are configured
    pub test_command: String,
    /// Command re-resolving the whole bundle
    pub install_command: String,
    /// Command prefix re-resolving a single gem; the gem name is appended
    pub update_command: String,
    /// Environment variables removed for child processes
    pub cleared_env: Vec<String>,
    /// Commit message with `{name}` and `{version}` placeholders
    pub commit_template: String,
    /// Compute candidates without touching the working tree
    pub dry_run: bool,
}

impl UpdaterConfig {
    /// Bundler defaults for a project rooted at `project_dir`
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        Self {
            manifest_path: project_dir.join("Gemfile"),
            lock_path: project_dir.join("Gemfile.lock"),
            project_dir,
            test_command: String::new(),
            install_command: "bundle install".to_string(),
            update_command: "bundle update".to_string(),
            cleared_env: CLEARED_ENV.iter().map(|s| s.to_string()).collect(),
            commit_template: DEFAULT_COMMIT_TEMPLATE.to_string(),
            dry_run: false,
        }
    }

    /// Set the test command
    pub fn with_test_command(mut self, command: impl Into<String>) -> Self {
        self.test_command = command.into();
        self
    }

    /// Set dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Targeted re-resolution command for one gem
    pub fn update_command_for(&self, name: &str) -> String {
        format!("{} {}", self.update_command, name)
    }

    /// Commit message for moving `name` to `version`
    pub fn commit_message(&self, name: &str, version: &str) -> String {
        self.commit_template
            .replace("{name}", name)
            .replace("{version}", version)
    }
}

/// Contents of `.gemup.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub test_command: Option<String>,
    pub only: Vec<String>,
    pub exclude: Vec<String>,
    pub max_level: Option<BumpLevel>,
    pub include_prerelease: Option<bool>,
}

impl ProjectConfig {
    /// Parse the TOML text of a project file
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `.gemup.toml` from `dir`; a missing file yields the defaults
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(PROJECT_CONFIG_FILE);
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::InvalidConfigFile {
                path,
                message: e.to_string(),
            }),
        }
    }
}

/// Fully resolved settings for a whole-Gemfile run
#[derive(Debug, Clone)]
pub struct Settings {
    pub updater: UpdaterConfig,
    pub filter: GemFilter,
    pub max_level: BumpLevel,
    pub include_prerelease: bool,
    pub min_age: Option<Duration>,
}

impl Settings {
    /// Merge CLI arguments over the project file. CLI values win.
    pub fn resolve(args: &CliArgs) -> Result<Self, ConfigError> {
        let project_dir = args.path.clone();
        if !project_dir.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: project_dir,
                message: "not a directory".to_string(),
            });
        }
        let file = ProjectConfig::from_dir(&project_dir)?;
        Ok(Self::merge(args, file))
    }

    fn merge(args: &CliArgs, file: ProjectConfig) -> Self {
        let test_command = args
            .test_command()
            .or(file.test_command)
            .unwrap_or_default();

        let only = if args.only.is_empty() {
            file.only
        } else {
            args.only.clone()
        };
        let exclude = if args.exclude.is_empty() {
            file.exclude
        } else {
            args.exclude.clone()
        };

        Self {
            updater: UpdaterConfig::new(&args.path)
                .with_test_command(test_command)
                .with_dry_run(args.dry_run),
            filter: GemFilter::new().with_only(only).with_exclude(exclude),
            max_level: args
                .max_level
                .or(file.max_level)
                .unwrap_or(BumpLevel::Major),
            include_prerelease: args.include_prerelease
                || file.include_prerelease.unwrap_or(false),
            min_age: args.age,
        }
    }
}
