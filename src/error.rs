//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Gemfile / Gemfile.lock access failures (fatal)
//! - RegistryError: Issues with RubyGems communication
//! - ConfigError: Issues with CLI or project configuration
//! - VcsError: Version control queries that could not be answered
//!
//! Soft failures of an update attempt are not errors; see `AttemptOutcome`.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Version control related errors
    #[error(transparent)]
    Vcs(#[from] VcsError),
}

/// Errors related to manifest and lockfile access
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the lockfile
    #[error("failed to read lockfile {path}: {source}")]
    LockReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Patch target is not declared in the manifest
    #[error("gem '{name}' is not declared in the Gemfile")]
    UnknownDependency { name: String },
}

/// Errors related to package registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid duration format
    #[error("invalid duration format '{value}': expected format like '2w', '10d', '1m'")]
    InvalidDuration { value: String },

    /// Invalid bump level
    #[error("invalid bump level '{value}': expected 'patch', 'minor' or 'major'")]
    InvalidBumpLevel { value: String },

    /// Invalid path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },

    /// Project configuration file could not be read or parsed
    #[error("invalid config file {path}: {message}")]
    InvalidConfigFile { path: PathBuf, message: String },

    /// Manifest or lockfile has uncommitted changes
    #[error("uncommitted changes in {}; commit or stash them first", .paths.join(", "))]
    DirtyWorkingTree { paths: Vec<String> },
}

/// Errors related to version control queries
#[derive(Error, Debug)]
pub enum VcsError {
    /// A git command could not be run or exited unsuccessfully
    #[error("{command} failed: {message}")]
    CommandFailed { command: String, message: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError, mapping a missing file to NotFound
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return ManifestError::NotFound { path };
        }
        ManifestError::ReadError { path, source }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new LockReadError
    pub fn lock_read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::LockReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new UnknownDependency error
    pub fn unknown_dependency(name: impl Into<String>) -> Self {
        ManifestError::UnknownDependency { name: name.into() }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl VcsError {
    /// Creates a new CommandFailed error
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        VcsError::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }
}
