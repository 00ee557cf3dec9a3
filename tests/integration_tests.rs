//! Integration tests for gemup
//!
//! These tests verify:
//! - Gemfile patching preserves formatting on disk
//! - Locked versions are read from a real Gemfile.lock
//! - Full update cycles (commit and revert) against files in a temp directory

use async_trait::async_trait;
use gemup::config::UpdaterConfig;
use gemup::domain::{AttemptOutcome, BumpLevel, Dependency};
use gemup::error::{RegistryError, VcsError};
use gemup::manifest::{FileLockSource, FileManifestStore, GemfileDocument, LockSource};
use gemup::registry::VersionIndex;
use gemup::shell::ShellRunner;
use gemup::update::{Collaborators, GemUpdater, VersionInfo, VersionSource};
use gemup::vcs::{Vcs, VcsStatus};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

const GEMFILE: &str = "source 'https://rubygems.org'\n\
\n\
gem 'rails', \"3.0.0\"\n\
group :test do\n\
  gem 'shoulda-matchers' , '~> 0.9' \n\
end\n\
gem 'mysql', :git => \"git://github.com/brianmario/mysql.git\"\n";

/// Lockfile listing every versioned gem of `gemfile`, the way bundler resolves them
fn lock_for(gemfile: &str) -> String {
    let mut lock = String::from("GEM\n  remote: https://rubygems.org/\n  specs:\n");
    for entry in GemfileDocument::parse(gemfile).entries() {
        let dependency = entry.to_dependency();
        if !dependency.version().is_empty() {
            lock.push_str(&format!("    {} ({})\n", dependency.name, dependency.version()));
        }
    }
    lock.push_str("\nDEPENDENCIES\n  rails\n");
    lock
}

mod manifest_files {
    use super::*;
    use gemup::manifest::ManifestStore;

    #[test]
    fn test_patch_gemfile_on_disk() {
        let dir = create_test_dir();
        let path = dir.path().join("Gemfile");
        fs::write(&path, GEMFILE).unwrap();

        let store = FileManifestStore::new(&path);
        let mut document = GemfileDocument::load(&store).unwrap();
        document
            .update_gem(&Dependency::new("shoulda-matchers", "0.9.2"), &store)
            .unwrap();
        document
            .update_gem(&Dependency::new("rails", "3.0.10"), &store)
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("gem 'rails', \"3.0.10\"\n"));
        assert!(written.contains("  gem 'shoulda-matchers' , '0.9.2' \n"));
        assert!(written.contains("gem 'mysql', :git => \"git://github.com/brianmario/mysql.git\"\n"));
        assert!(written.starts_with("source 'https://rubygems.org'\n\n"));
        assert_eq!(store.read_manifest().unwrap(), written);
    }

    #[test]
    fn test_patch_preserves_crlf() {
        let dir = create_test_dir();
        let path = dir.path().join("Gemfile");
        fs::write(&path, "gem 'rake', '10.0.0'\r\ngem 'rack'").unwrap();

        let store = FileManifestStore::new(&path);
        let mut document = GemfileDocument::load(&store).unwrap();
        document
            .update_gem(&Dependency::new("rack", "1.2.0"), &store)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "gem 'rake', '10.0.0'\r\ngem 'rack', '1.2.0'"
        );
    }

    #[test]
    fn test_unknown_gem_is_an_error() {
        let dir = create_test_dir();
        let path = dir.path().join("Gemfile");
        fs::write(&path, GEMFILE).unwrap();

        let store = FileManifestStore::new(&path);
        let mut document = GemfileDocument::load(&store).unwrap();
        assert!(document
            .update_gem(&Dependency::new("sinatra", "2.0.0"), &store)
            .is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), GEMFILE);
    }

    #[test]
    fn test_locked_versions_from_disk() {
        let dir = create_test_dir();
        let path = dir.path().join("Gemfile.lock");
        fs::write(&path, lock_for(GEMFILE)).unwrap();

        let lock = FileLockSource::new(&path);
        assert_eq!(
            lock.locked_version_for("rails").unwrap().as_deref(),
            Some("3.0.0")
        );
        assert_eq!(
            lock.locked_version_for("shoulda-matchers").unwrap().as_deref(),
            Some("0.9")
        );
        assert_eq!(lock.locked_version_for("mysql").unwrap(), None);
    }

    #[test]
    fn test_missing_lockfile_means_unlocked() {
        let dir = create_test_dir();
        let lock = FileLockSource::new(dir.path().join("Gemfile.lock"));
        assert_eq!(lock.locked_version_for("rails").unwrap(), None);
    }
}

mod update_cycle {
    use super::*;

    /// Bundler stand-in: `bundle install` rewrites the lockfile from the Gemfile
    struct FakeBundler {
        dir: PathBuf,
        tests_pass: Cell<bool>,
        commands: RefCell<Vec<String>>,
    }

    impl ShellRunner for FakeBundler {
        fn run(&self, command: &str) -> bool {
            self.commands.borrow_mut().push(command.to_string());
            match command {
                "bundle install" => {
                    let gemfile = fs::read_to_string(self.dir.join("Gemfile")).unwrap();
                    fs::write(self.dir.join("Gemfile.lock"), lock_for(&gemfile)).unwrap();
                    true
                }
                "rake test" => self.tests_pass.get(),
                _ => false,
            }
        }
    }

    /// Git stand-in keeping the committed text of each file in memory
    struct SnapshotVcs {
        committed: RefCell<BTreeMap<PathBuf, String>>,
        messages: RefCell<Vec<String>>,
    }

    impl SnapshotVcs {
        fn new(files: &[&Path]) -> Self {
            let committed = files
                .iter()
                .map(|p| (p.to_path_buf(), fs::read_to_string(p).unwrap()))
                .collect();
            Self {
                committed: RefCell::new(committed),
                messages: RefCell::new(Vec::new()),
            }
        }
    }

    impl Vcs for SnapshotVcs {
        fn status(&self) -> Result<VcsStatus, VcsError> {
            let modified_paths = self
                .committed
                .borrow()
                .iter()
                .filter(|(path, text)| fs::read_to_string(path).ok().as_ref() != Some(*text))
                .map(|(path, _)| path.clone())
                .collect();
            Ok(VcsStatus { modified_paths })
        }

        fn checkout(&self, paths: &[&Path]) -> bool {
            let committed = self.committed.borrow();
            paths.iter().all(|p| match committed.get(*p) {
                Some(text) => fs::write(p, text).is_ok(),
                None => false,
            })
        }

        fn commit(&self, paths: &[&Path], message: &str) -> bool {
            let mut committed = self.committed.borrow_mut();
            for p in paths {
                committed.insert(p.to_path_buf(), fs::read_to_string(p).unwrap());
            }
            self.messages.borrow_mut().push(message.to_string());
            true
        }
    }

    struct RailsIndex;

    #[async_trait]
    impl VersionIndex for RailsIndex {
        fn registry_name(&self) -> &'static str {
            "test"
        }

        async fn fetch_versions(&self, package: &str) -> Result<Vec<VersionInfo>, RegistryError> {
            match package {
                "rails" => Ok(["4.0.0", "3.2.1", "3.1.0", "3.0.10", "3.0.9", "3.0.0", "3.1.0.rc1"]
                    .iter()
                    .map(|v| VersionInfo::now(*v).with_prerelease(v.contains("rc")))
                    .collect()),
                _ => Err(RegistryError::package_not_found(package, "test")),
            }
        }
    }

    struct Project {
        dir: TempDir,
        config: UpdaterConfig,
    }

    impl Project {
        fn new() -> Self {
            let dir = create_test_dir();
            fs::write(dir.path().join("Gemfile"), GEMFILE).unwrap();
            fs::write(dir.path().join("Gemfile.lock"), lock_for(GEMFILE)).unwrap();
            let config = UpdaterConfig::new(dir.path()).with_test_command("rake test");
            Self { dir, config }
        }

        fn gemfile(&self) -> String {
            fs::read_to_string(self.dir.path().join("Gemfile")).unwrap()
        }

        fn lockfile(&self) -> String {
            fs::read_to_string(self.dir.path().join("Gemfile.lock")).unwrap()
        }
    }

    #[tokio::test]
    async fn test_auto_update_commits_each_level() {
        let project = Project::new();
        let store = FileManifestStore::new(&project.config.manifest_path);
        let lock = FileLockSource::new(&project.config.lock_path);
        let shell = FakeBundler {
            dir: project.dir.path().to_path_buf(),
            tests_pass: Cell::new(true),
            commands: RefCell::new(Vec::new()),
        };
        let vcs = SnapshotVcs::new(&[
            project.config.manifest_path.as_path(),
            project.config.lock_path.as_path(),
        ]);
        let collaborators = Collaborators {
            manifest: &store,
            lock: &lock,
            versions: VersionSource::new(&RailsIndex),
            shell: &shell,
            vcs: &vcs,
        };

        let updater = GemUpdater::new(Dependency::new("rails", "3.0.0"), &collaborators, &project.config);
        let report = updater.auto_update().await.unwrap();

        let targets: Vec<_> = report
            .attempts
            .iter()
            .map(|a| a.outcome.target().unwrap_or_default().to_string())
            .collect();
        assert_eq!(targets, vec!["3.0.10", "3.2.1", "4.0.0"]);
        assert!(report.attempts.iter().all(|a| a.outcome.is_success()));
        assert_eq!(report.locked_before.as_deref(), Some("3.0.0"));

        assert!(project.gemfile().contains("gem 'rails', \"4.0.0\"\n"));
        assert!(project.lockfile().contains("    rails (4.0.0)\n"));
        assert_eq!(
            *vcs.messages.borrow(),
            vec![
                "Auto update rails to version 3.0.10",
                "Auto update rails to version 3.2.1",
                "Auto update rails to version 4.0.0",
            ]
        );
        assert!(vcs.status().unwrap().modified_paths.is_empty());
    }

    #[tokio::test]
    async fn test_failing_tests_restore_both_files() {
        let project = Project::new();
        let store = FileManifestStore::new(&project.config.manifest_path);
        let lock = FileLockSource::new(&project.config.lock_path);
        let shell = FakeBundler {
            dir: project.dir.path().to_path_buf(),
            tests_pass: Cell::new(false),
            commands: RefCell::new(Vec::new()),
        };
        let vcs = SnapshotVcs::new(&[
            project.config.manifest_path.as_path(),
            project.config.lock_path.as_path(),
        ]);
        let collaborators = Collaborators {
            manifest: &store,
            lock: &lock,
            versions: VersionSource::new(&RailsIndex),
            shell: &shell,
            vcs: &vcs,
        };

        let updater = GemUpdater::new(Dependency::new("rails", "3.0.0"), &collaborators, &project.config);
        assert!(!updater.update(BumpLevel::Minor).await.unwrap());

        assert_eq!(project.gemfile(), GEMFILE);
        assert_eq!(project.lockfile(), lock_for(GEMFILE));
        assert!(vcs.messages.borrow().is_empty());
        assert_eq!(
            *shell.commands.borrow(),
            vec!["bundle install".to_string(), "rake test".to_string()]
        );
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let mut project = Project::new();
        project.config = project.config.clone().with_dry_run(true);
        let store = FileManifestStore::new(&project.config.manifest_path);
        let lock = FileLockSource::new(&project.config.lock_path);
        let shell = FakeBundler {
            dir: project.dir.path().to_path_buf(),
            tests_pass: Cell::new(true),
            commands: RefCell::new(Vec::new()),
        };
        let vcs = SnapshotVcs::new(&[
            project.config.manifest_path.as_path(),
            project.config.lock_path.as_path(),
        ]);
        let collaborators = Collaborators {
            manifest: &store,
            lock: &lock,
            versions: VersionSource::new(&RailsIndex),
            shell: &shell,
            vcs: &vcs,
        };

        let updater = GemUpdater::new(Dependency::new("rails", "3.0.0"), &collaborators, &project.config);
        let outcome = updater.attempt(BumpLevel::Major).await.unwrap();

        assert_eq!(
            outcome,
            AttemptOutcome::Planned {
                from: "3.0.0".into(),
                to: "4.0.0".into()
            }
        );
        assert_eq!(project.gemfile(), GEMFILE);
        assert!(shell.commands.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_last_version_skips_prereleases() {
        let project = Project::new();
        let store = FileManifestStore::new(&project.config.manifest_path);
        let lock = FileLockSource::new(&project.config.lock_path);
        let shell = FakeBundler {
            dir: project.dir.path().to_path_buf(),
            tests_pass: Cell::new(true),
            commands: RefCell::new(Vec::new()),
        };
        let vcs = SnapshotVcs::new(&[project.config.manifest_path.as_path()]);

        let stable = Collaborators {
            manifest: &store,
            lock: &lock,
            versions: VersionSource::new(&RailsIndex),
            shell: &shell,
            vcs: &vcs,
        };
        let updater = GemUpdater::new(Dependency::new("rails", "3.0.0"), &stable, &project.config);
        assert_eq!(updater.last_version(BumpLevel::Minor).await.unwrap(), "3.2.1");
        assert!(!updater
            .available_versions()
            .await
            .unwrap()
            .contains(&"3.1.0.rc1".to_string()));

        let with_pre = Collaborators {
            manifest: &store,
            lock: &lock,
            versions: VersionSource::new(&RailsIndex).with_include_prerelease(true),
            shell: &shell,
            vcs: &vcs,
        };
        let updater = GemUpdater::new(Dependency::new("rails", "3.0.0"), &with_pre, &project.config);
        assert!(updater
            .available_versions()
            .await
            .unwrap()
            .contains(&"3.1.0.rc1".to_string()));
    }
}
