//! Shell integration for re-resolving the bundle and running tests
//!
//! This module provides:
//! - A narrow `ShellRunner` capability: run a command line, report success
//! - `SystemShell`, which spawns `sh -c` in the project directory
//! - Bundle re-resolution with a targeted fallback

use crate::config::UpdaterConfig;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Runs shell command lines and reports whether they exited successfully
pub trait ShellRunner {
    /// Run `command`; true when it exits with status 0
    fn run(&self, command: &str) -> bool;
}

/// Shell runner that executes real commands through `sh -c`
#[derive(Debug, Clone)]
pub struct SystemShell {
    working_dir: PathBuf,
    cleared_env: Vec<String>,
}

impl SystemShell {
    /// Create a shell rooted at `working_dir` with nothing removed from the environment
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            cleared_env: Vec::new(),
        }
    }

    /// Create a shell from the updater configuration
    pub fn from_config(config: &UpdaterConfig) -> Self {
        Self {
            working_dir: config.project_dir.clone(),
            cleared_env: config.cleared_env.clone(),
        }
    }

    /// Directory commands run in
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run a command and capture output
    fn run_command(&self, command: &str) -> std::io::Result<Output> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command).current_dir(&self.working_dir);
        for var in &self.cleared_env {
            cmd.env_remove(var);
        }
        cmd.output()
    }
}

impl ShellRunner for SystemShell {
    fn run(&self, command: &str) -> bool {
        match self.run_command(command) {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::debug!(
                    command,
                    status = ?output.status.code(),
                    stdout = %stdout.trim_end(),
                    stderr = %stderr.trim_end(),
                    "command finished"
                );
                output.status.success()
            }
            Err(e) => {
                tracing::warn!(command, error = %e, "failed to execute command");
                false
            }
        }
    }
}

/// Re-resolve the bundle after the Gemfile changed.
///
/// A plain install is tried first. When another locked gem blocks it, only
/// `name` is re-resolved with the targeted update command.
pub fn resolve_dependency(shell: &dyn ShellRunner, config: &UpdaterConfig, name: &str) -> bool {
    if shell.run(&config.install_command) {
        return true;
    }
    let targeted = config.update_command_for(name);
    tracing::debug!(gem = name, command = %targeted, "install failed, retrying targeted update");
    shell.run(&targeted)
}
