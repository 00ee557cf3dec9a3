//! Registry adapters for fetching gem version information
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - RubyGems versions API adapter

mod client;
mod rubygems;

pub use client::HttpClient;
pub use rubygems::RubyGemsAdapter;

use crate::error::RegistryError;
use crate::update::VersionInfo;
use async_trait::async_trait;

/// Index of published versions for a package name
#[async_trait]
pub trait VersionIndex: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch every published version of a package, in no particular order
    async fn fetch_versions(&self, package: &str) -> Result<Vec<VersionInfo>, RegistryError>;
}
