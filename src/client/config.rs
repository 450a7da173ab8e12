//! Configuration for the workspace API session
//!
//! Loaded from TOML or from the `DATABRICKS_*` environment variables:
//!
//! ```toml
//! host = "https://example.cloud.databricks.com"
//! token = "dapi..."
//! timeout_seconds = 60
//!
//! [retry]
//! max_attempts = 6
//! strategy = "exponential"
//! base_delay_ms = 250
//! max_delay_ms = 10000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::retry::{BackoffStrategy, RetryPolicy};
use crate::error::{Result, WorkspaceError};

/// Environment variable holding the workspace URL
pub const ENV_HOST: &str = "DATABRICKS_HOST";
/// Environment variable holding the personal access token
pub const ENV_TOKEN: &str = "DATABRICKS_TOKEN";
/// Environment variable overriding the request timeout
pub const ENV_TIMEOUT: &str = "DATABRICKS_TIMEOUT_SECONDS";

/// Retry settings as they appear in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default)]
    pub strategy: BackoffStrategy,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    6
}

fn default_base_delay_ms() -> u64 {
    250
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            strategy: BackoffStrategy::default(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            self.strategy,
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

/// Workspace API session configuration
///
/// The token is never serialized, displayed or logged.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Workspace URL (e.g., https://xxx.cloud.databricks.com)
    pub host: String,

    #[serde(default, skip_serializing)]
    token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: None,
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Read DATABRICKS_HOST, DATABRICKS_TOKEN and DATABRICKS_TIMEOUT_SECONDS
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(ENV_HOST)
            .ok_or_else(|| WorkspaceError::Config(format!("{ENV_HOST} is not set")))?;

        let mut config = ClientConfig::new(host);
        if let Some(token) = lookup(ENV_TOKEN) {
            config = config.with_token(token);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            let seconds = raw.trim().parse::<u64>().map_err(|e| {
                WorkspaceError::Config(format!("{ENV_TIMEOUT}='{raw}' is not a number: {e}"))
            })?;
            config = config.with_timeout(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content)
            .map_err(|e| WorkspaceError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            WorkspaceError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(WorkspaceError::Config("host cannot be empty".to_string()));
        }
        if !(self.host.starts_with("https://") || self.host.starts_with("http://")) {
            return Err(WorkspaceError::Config(format!(
                "host '{}' must start with http:// or https://",
                self.host
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(WorkspaceError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL of the REST API, e.g. `https://host/api/2.0`
    pub fn api_base_url(&self) -> String {
        format!("{}/api/2.0", self.host.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("retry", &self.retry)
            .finish()
    }
}

// Implement Display to prevent accidental token logging
impl std::fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.host)
    }
}
