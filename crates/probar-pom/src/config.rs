//! Configuration shared by every page built from it.
//!
//! Loadable from YAML or from `PROBAR_POM_*` environment variables.

use crate::result::{PomError, PomResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable for [`PomConfig::base_url`]
pub const ENV_BASE_URL: &str = "PROBAR_POM_BASE_URL";
/// Environment variable for [`PomConfig::timeout_ms`]
pub const ENV_TIMEOUT_MS: &str = "PROBAR_POM_TIMEOUT_MS";
/// Environment variable for [`PomConfig::poll_interval_ms`]
pub const ENV_POLL_INTERVAL_MS: &str = "PROBAR_POM_POLL_INTERVAL_MS";

/// Base URL and wait settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomConfig {
    /// Base URL of the site under test
    pub base_url: Option<String>,
    /// Load timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for PomConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PomConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the load timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Wait options with this config's timeout and interval
    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(self.timeout_ms)
            .with_poll_interval(self.poll_interval_ms)
    }

    /// Parse from YAML. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`PomError::Yaml`] if the document is malformed.
    pub fn from_yaml_str(yaml: &str) -> PomResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load from a YAML file
    ///
    /// # Errors
    ///
    /// [`PomError::Io`] if the file cannot be read, [`PomError::Yaml`] if it
    /// does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> PomResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded pom config");
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML
    ///
    /// # Errors
    ///
    /// [`PomError::Yaml`] if serialization fails.
    pub fn to_yaml(&self) -> PomResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Defaults overridden by `PROBAR_POM_*` environment variables
    ///
    /// # Errors
    ///
    /// [`PomError::Config`] if a numeric variable does not parse.
    pub fn from_env() -> PomResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `PROBAR_POM_*` key
    ///
    /// # Errors
    ///
    /// [`PomError::Config`] if a numeric value does not parse.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> PomResult<Self> {
        let mut config = Self::default();
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config.base_url = Some(base_url);
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = parse_millis(ENV_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_POLL_INTERVAL_MS) {
            config.poll_interval_ms = parse_millis(ENV_POLL_INTERVAL_MS, &value)?;
        }
        Ok(config)
    }
}

fn parse_millis(key: &str, value: &str) -> PomResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| PomError::config(format!("{key}={value:?} is not a number of milliseconds: {e}")))
}
