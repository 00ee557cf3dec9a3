//! Whole-Gemfile run
//!
//! This module provides:
//! - Workflow coordination: load Gemfile → check working tree → update each gem
//! - Gem filter application
//! - Dry-run mode support
//!
//! Gems are processed strictly one after another; every attempt finishes
//! (commit or revert) before the next one touches the working tree.

use crate::config::Settings;
use crate::domain::{BumpLevel, Dependency, RunSummary};
use crate::error::{AppError, ConfigError};
use crate::manifest::{FileLockSource, FileManifestStore, GemfileDocument};
use crate::progress::Progress;
use crate::registry::{HttpClient, RubyGemsAdapter, VersionIndex};
use crate::shell::SystemShell;
use crate::update::{Collaborators, GemFilter, GemUpdater, VersionSource};
use crate::vcs::{GitVcs, Vcs};
use std::collections::BTreeSet;
use std::path::Path;

/// Orchestrator for a run over one project
pub struct Orchestrator {
    /// Resolved run settings
    settings: Settings,
    /// HTTP client for registry requests
    client: HttpClient,
}

impl Orchestrator {
    /// Create a new orchestrator with the given settings
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let client = HttpClient::new()?;
        Ok(Self { settings, client })
    }

    /// Create an orchestrator with a custom HTTP client (for testing)
    pub fn with_client(settings: Settings, client: HttpClient) -> Self {
        Self { settings, client }
    }

    /// Run the update workflow against the real project
    pub async fn run(&self, show_progress: bool) -> Result<RunSummary, AppError> {
        let config = &self.settings.updater;
        let store = FileManifestStore::new(&config.manifest_path);
        let lock = FileLockSource::new(&config.lock_path);
        let index = RubyGemsAdapter::new(self.client.clone());
        let shell = SystemShell::from_config(config);
        let vcs = GitVcs::new(&config.project_dir);

        let collaborators = Collaborators {
            manifest: &store,
            lock: &lock,
            versions: self.version_source(&index),
            shell: &shell,
            vcs: &vcs,
        };

        let mut progress = Progress::new(show_progress);
        run_with(&collaborators, &self.settings, &mut progress).await
    }

    /// Build the version source from the release policy settings
    fn version_source<'a>(&self, index: &'a dyn VersionIndex) -> VersionSource<'a> {
        VersionSource::new(index)
            .with_include_prerelease(self.settings.include_prerelease)
            .with_min_age(
                self.settings
                    .min_age
                    .and_then(|age| chrono::Duration::from_std(age).ok()),
            )
    }
}

/// Run every selected gem of the Gemfile through the update cycle
pub async fn run_with(
    collaborators: &Collaborators<'_>,
    settings: &Settings,
    progress: &mut Progress,
) -> Result<RunSummary, AppError> {
    let config = &settings.updater;
    let document = GemfileDocument::load(collaborators.manifest)?;

    if !config.dry_run {
        progress.spinner("Checking working tree...");
        let clean = ensure_clean(
            collaborators.vcs,
            &[collaborators.manifest.path(), config.lock_path.as_path()],
        );
        progress.finish_and_clear();
        clean?;
    }

    let gems = select_gems(&document, &settings.filter);
    let levels = BumpLevel::up_to(settings.max_level);
    let mut summary = RunSummary::new(config.dry_run);
    tracing::debug!(gems = gems.len(), max_level = %settings.max_level, "starting run");

    progress.start(gems.len() as u64, "Updating gems");
    for dependency in gems {
        progress.set_message(&format!("Updating {}", dependency.name));
        let updater = GemUpdater::new(dependency, collaborators, config);
        let report = match updater.auto_update_levels(&levels).await {
            Ok(report) => report,
            Err(e) => {
                progress.finish_and_clear();
                return Err(e);
            }
        };
        summary.add(report);
        progress.inc();
    }
    progress.finish_and_clear();

    Ok(summary)
}

/// Declared gems passing the filter, first declaration only, in Gemfile order
fn select_gems(document: &GemfileDocument, filter: &GemFilter) -> Vec<Dependency> {
    let mut seen = BTreeSet::new();
    document
        .entries()
        .iter()
        .filter(|entry| filter.should_process(&entry.name))
        .filter(|entry| seen.insert(entry.name.clone()))
        .map(|entry| entry.to_dependency())
        .collect()
}

/// Refuse to run over uncommitted Gemfile or lockfile edits; a revert would discard them
fn ensure_clean(vcs: &dyn Vcs, paths: &[&Path]) -> Result<(), AppError> {
    let status = vcs.status()?;
    let dirty = status.modified_among(paths);
    if dirty.is_empty() {
        return Ok(());
    }
    Err(ConfigError::DirtyWorkingTree {
        paths: dirty.iter().map(|p| p.display().to_string()).collect(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpdaterConfig;
    use crate::domain::AttemptOutcome;
    use crate::error::{ManifestError, RegistryError, VcsError};
    use crate::manifest::{LockSource, ManifestStore};
    use crate::shell::ShellRunner;
    use crate::update::VersionInfo;
    use crate::vcs::VcsStatus;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    /// Project where every command succeeds
    struct CleanProject {
        gemfile: RefCell<String>,
        locked: BTreeMap<&'static str, &'static str>,
        dirty: Vec<PathBuf>,
        log: RefCell<Vec<String>>,
    }

    impl CleanProject {
        fn new(gemfile: &str, locked: &[(&'static str, &'static str)]) -> Self {
            Self {
                gemfile: RefCell::new(gemfile.to_string()),
                locked: locked.iter().copied().collect(),
                dirty: Vec::new(),
                log: RefCell::new(Vec::new()),
            }
        }
    }

    impl ManifestStore for CleanProject {
        fn path(&self) -> &Path {
            Path::new("Gemfile")
        }

        fn read_manifest(&self) -> Result<String, ManifestError> {
            Ok(self.gemfile.borrow().clone())
        }

        fn write_manifest(&self, content: &str) -> Result<(), ManifestError> {
            *self.gemfile.borrow_mut() = content.to_string();
            Ok(())
        }
    }

    impl LockSource for CleanProject {
        fn locked_version_for(&self, name: &str) -> Result<Option<String>, ManifestError> {
            Ok(self.locked.get(name).map(|v| v.to_string()))
        }
    }

    impl ShellRunner for CleanProject {
        fn run(&self, command: &str) -> bool {
            self.log.borrow_mut().push(command.to_string());
            true
        }
    }

    impl Vcs for CleanProject {
        fn status(&self) -> Result<VcsStatus, VcsError> {
            Ok(VcsStatus {
                modified_paths: self.dirty.iter().cloned().collect(),
            })
        }

        fn checkout(&self, _paths: &[&Path]) -> bool {
            true
        }

        fn commit(&self, _paths: &[&Path], message: &str) -> bool {
            self.log.borrow_mut().push(message.to_string());
            true
        }
    }

    struct Index;

    #[async_trait]
    impl VersionIndex for Index {
        fn registry_name(&self) -> &'static str {
            "test"
        }

        async fn fetch_versions(&self, package: &str) -> Result<Vec<VersionInfo>, RegistryError> {
            let versions: &[&str] = match package {
                "rails" => &["3.1.0", "3.0.1", "3.0.0"],
                "rack" => &["1.2.0", "1.1.1", "1.1.0"],
                _ => &[],
            };
            Ok(versions.iter().map(|v| VersionInfo::now(*v)).collect())
        }
    }

    const GEMFILE: &str = "source 'https://rubygems.org'\n\
        gem 'rails', '3.0.0'\n\
        gem 'rack', '< 1.2'\n\
        group :test do\n  gem 'rspec'\nend\n";

    fn settings(dry_run: bool) -> Settings {
        Settings {
            updater: UpdaterConfig::new("").with_dry_run(dry_run),
            filter: GemFilter::new(),
            max_level: BumpLevel::Major,
            include_prerelease: false,
            min_age: None,
        }
    }

    fn collaborators<'a>(project: &'a CleanProject) -> Collaborators<'a> {
        Collaborators {
            manifest: project,
            lock: project,
            versions: VersionSource::new(&Index),
            shell: project,
            vcs: project,
        }
    }

    #[tokio::test]
    async fn test_run_updates_each_gem() {
        let project = CleanProject::new(GEMFILE, &[("rails", "3.0.0"), ("rack", "1.1.0")]);
        let collab = collaborators(&project);

        let summary = run_with(&collab, &settings(false), &mut Progress::disabled())
            .await
            .unwrap();

        assert_eq!(summary.total(), 3);
        let rails = &summary.gems[0];
        assert_eq!(rails.name(), "rails");
        assert_eq!(rails.attempts[0].level, BumpLevel::Patch);
        assert!(rails.upgraded());

        let rack = &summary.gems[1];
        assert_eq!(rack.skipped, Some(AttemptOutcome::NotUpdatable));

        let rspec = &summary.gems[2];
        assert_eq!(rspec.attempts[0].outcome, AttemptOutcome::NoLockedVersion);
        assert!(project
            .log
            .borrow()
            .contains(&"Auto update rails to version 3.0.1".to_string()));
    }

    #[tokio::test]
    async fn test_run_respects_filter_and_max_level() {
        let project = CleanProject::new(GEMFILE, &[("rails", "3.0.0")]);
        let collab = collaborators(&project);
        let mut settings = settings(true);
        settings.filter = GemFilter::new().with_only(vec!["rails".to_string()]);
        settings.max_level = BumpLevel::Patch;

        let summary = run_with(&collab, &settings, &mut Progress::disabled())
            .await
            .unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.total(), 1);
        assert_eq!(
            summary.gems[0].attempts[0].outcome,
            AttemptOutcome::Planned {
                from: "3.0.0".into(),
                to: "3.0.1".into()
            }
        );
        assert_eq!(summary.gems[0].attempts.len(), 1);
        assert!(project.log.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_run_aborts_on_dirty_tree() {
        let mut project = CleanProject::new(GEMFILE, &[("rails", "3.0.0")]);
        project.dirty = vec![PathBuf::from("Gemfile.lock")];
        let collab = collaborators(&project);

        let err = run_with(&collab, &settings(false), &mut Progress::disabled())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Config(ConfigError::DirtyWorkingTree { ref paths }) if paths == &["Gemfile.lock"]
        ));
        assert!(project.log.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_ignores_dirty_tree() {
        let mut project = CleanProject::new(GEMFILE, &[("rails", "3.0.0")]);
        project.dirty = vec![PathBuf::from("Gemfile")];
        let collab = collaborators(&project);

        assert!(run_with(&collab, &settings(true), &mut Progress::disabled())
            .await
            .is_ok());
    }

    #[test]
    fn test_select_gems_first_declaration_wins() {
        let document = GemfileDocument::parse(
            "gem 'pg', '1.0.0', platforms: :ruby\ngem 'pg', '0.9.0'\ngem 'rake'\n",
        );
        let gems = select_gems(&document, &GemFilter::new());
        let names: Vec<_> = gems.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["pg", "rake"]);
        assert_eq!(gems[0].version(), "1.0.0");
    }

    #[test]
    fn test_select_gems_exclude() {
        let document = GemfileDocument::parse(GEMFILE);
        let filter = GemFilter::new().with_exclude(vec!["rack".to_string()]);
        let names: Vec<_> = select_gems(&document, &filter)
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["rails", "rspec"]);
    }
}
