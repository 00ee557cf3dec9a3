//! HTTP client shared by registry adapters
//!
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry on rate limiting and transport errors
//! - 404 mapped to `PackageNotFound`

use crate::error::RegistryError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default timeout for HTTP requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("gemup/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error("", "HTTP client", format!("failed to build: {}", e))
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// GET `url`, retrying with backoff on 429 and transport failures
    pub async fn get(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<reqwest::Response, RegistryError> {
        let mut delay = BASE_DELAY_MS;
        let mut attempt = 0;

        loop {
            let error = match self.client.get(url).send().await {
                Ok(response) => match response.status() {
                    StatusCode::TOO_MANY_REQUESTS => RegistryError::rate_limit_exceeded(registry),
                    StatusCode::NOT_FOUND => {
                        return Err(RegistryError::package_not_found(package, registry))
                    }
                    status if !status.is_success() => {
                        return Err(RegistryError::network_error(
                            package,
                            registry,
                            format!("HTTP {}", status),
                        ))
                    }
                    _ => return Ok(response),
                },
                Err(e) if e.is_timeout() => RegistryError::timeout(package, registry),
                Err(e) => RegistryError::network_error(package, registry, e.to_string()),
            };

            if attempt >= self.max_retries {
                return Err(error);
            }
            tracing::debug!(url, attempt, %error, "retrying registry request");
            tokio::time::sleep(Duration::from_millis(delay)).await;
            delay *= 2;
            attempt += 1;
        }
    }

    /// GET `url` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        let response = self.get(url, package, registry).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RegistryError::InvalidResponse {
                package: package.to_string(),
                registry: registry.to_string(),
                message: format!("failed to parse JSON: {}", e),
            })
    }
}
