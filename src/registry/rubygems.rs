//! RubyGems registry adapter
//!
//! Fetches every published version of a gem.
//! API endpoint: https://rubygems.org/api/v1/versions/{gem}.json

use crate::error::RegistryError;
use crate::registry::{HttpClient, VersionIndex};
use crate::update::VersionInfo;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// RubyGems API base URL
const RUBYGEMS_API_URL: &str = "https://rubygems.org/api/v1/versions";

/// One entry of the versions endpoint. Platform builds repeat the number.
#[derive(Debug, Deserialize)]
struct RubyGemsVersion {
    number: String,
    #[serde(default)]
    prerelease: bool,
    created_at: Option<DateTime<Utc>>,
}

impl From<RubyGemsVersion> for VersionInfo {
    fn from(v: RubyGemsVersion) -> Self {
        let released_at = v.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        VersionInfo::new(v.number, released_at).with_prerelease(v.prerelease)
    }
}

/// RubyGems registry adapter
pub struct RubyGemsAdapter {
    client: HttpClient,
    base_url: String,
}

impl RubyGemsAdapter {
    /// Create a new RubyGems adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, RUBYGEMS_API_URL)
    }

    /// Create an adapter against a mirror of the versions API
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a gem
    fn build_url(&self, gem: &str) -> String {
        format!("{}/{}.json", self.base_url, gem)
    }
}

fn parse_versions(body: Vec<RubyGemsVersion>) -> Vec<VersionInfo> {
    body.into_iter().map(VersionInfo::from).collect()
}

#[async_trait]
impl VersionIndex for RubyGemsAdapter {
    fn registry_name(&self) -> &'static str {
        "RubyGems"
    }

    async fn fetch_versions(&self, package: &str) -> Result<Vec<VersionInfo>, RegistryError> {
        let url = self.build_url(package);
        tracing::debug!(%url, "fetching gem versions");
        let body: Vec<RubyGemsVersion> = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;
        Ok(parse_versions(body))
    }
}
