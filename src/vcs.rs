//! Version control for the project working tree
//!
//! Paths handed to and returned by a [`Vcs`] are the project paths the
//! updater already works with (`<project>/Gemfile`, `<project>/Gemfile.lock`).

use crate::error::VcsError;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Typed result of a working tree status query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VcsStatus {
    /// Paths with staged, unstaged or untracked changes
    pub modified_paths: BTreeSet<PathBuf>,
}

impl VcsStatus {
    /// Returns true if `path` has pending changes
    pub fn is_modified(&self, path: &Path) -> bool {
        self.modified_paths.contains(path)
    }

    /// Pending paths among `paths`
    pub fn modified_among<'p>(&self, paths: &[&'p Path]) -> Vec<&'p Path> {
        paths
            .iter()
            .copied()
            .filter(|p| self.is_modified(p))
            .collect()
    }
}

/// Version control operations the updater needs
pub trait Vcs {
    /// Query pending changes in the working tree
    fn status(&self) -> Result<VcsStatus, VcsError>;

    /// Restore `paths` to their last committed state
    fn checkout(&self, paths: &[&Path]) -> bool;

    /// Stage `paths` and commit them with `message`
    fn commit(&self, paths: &[&Path], message: &str) -> bool;
}

/// Extract changed paths from `git status --porcelain` output.
///
/// Renames (`R  old -> new`) report the new path.
pub fn parse_porcelain(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.len() > 3)
        .map(|line| {
            let path = line[3..].trim();
            match path.split_once(" -> ") {
                Some((_, new)) => new.trim(),
                None => path,
            }
        })
        .map(|path| path.trim_matches('"').to_string())
        .collect()
}

/// Git working tree rooted at (or containing) the project directory
pub struct GitVcs {
    project_dir: PathBuf,
}

impl GitVcs {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<Output, VcsError> {
        Command::new("git")
            .current_dir(&self.project_dir)
            .args(args)
            .output()
            .map_err(|e| VcsError::command_failed(format!("git {}", args.join(" ")), e.to_string()))
    }

    fn ensure_success(output: &Output, command: &str) -> Result<(), VcsError> {
        if output.status.success() {
            return Ok(());
        }
        Err(VcsError::command_failed(
            command,
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }

    /// Project directory relative to the repository root, e.g. `app/`
    fn repo_prefix(&self) -> Result<String, VcsError> {
        let output = self.run_git(&["rev-parse", "--show-prefix"])?;
        Self::ensure_success(&output, "git rev-parse")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn run_logged(&self, args: &[&str]) -> bool {
        let command = format!("git {}", args.first().copied().unwrap_or_default());
        match self
            .run_git(args)
            .and_then(|output| Self::ensure_success(&output, &command))
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "git command failed");
                false
            }
        }
    }

    /// `path` as git sees it when run from `project_dir`.
    ///
    /// Updater paths already start with the project dir (`app/Gemfile`);
    /// passed unchanged, git would look for `app/app/Gemfile`.
    fn git_path<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.project_dir).unwrap_or(path)
    }

    fn path_args<'p>(&self, paths: &[&'p Path]) -> Vec<Cow<'p, str>> {
        paths
            .iter()
            .map(|p| self.git_path(*p).to_string_lossy())
            .collect()
    }
}

impl Vcs for GitVcs {
    fn status(&self) -> Result<VcsStatus, VcsError> {
        let prefix = self.repo_prefix()?;
        let output = self.run_git(&["status", "--porcelain"])?;
        Self::ensure_success(&output, "git status")?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let modified_paths = parse_porcelain(&stdout)
            .into_iter()
            .filter_map(|path| {
                path.strip_prefix(prefix.as_str())
                    .map(|rel| self.project_dir.join(rel))
            })
            .collect();
        Ok(VcsStatus { modified_paths })
    }

    fn checkout(&self, paths: &[&Path]) -> bool {
        let owned = self.path_args(paths);
        let mut args = vec!["checkout", "--"];
        args.extend(owned.iter().map(|p| p.as_ref()));
        self.run_logged(&args)
    }

    fn commit(&self, paths: &[&Path], message: &str) -> bool {
        let owned = self.path_args(paths);

        let mut add = vec!["add", "--"];
        add.extend(owned.iter().map(|p| p.as_ref()));
        if !self.run_logged(&add) {
            return false;
        }

        let mut commit = vec!["commit", "-m", message, "--"];
        commit.extend(owned.iter().map(|p| p.as_ref()));
        self.run_logged(&commit)
    }
}
