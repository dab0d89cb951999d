//! Shell configuration.
//!
//! Settings come from `<config dir>/config.json` when present, and may be
//! overridden per invocation from the command line or environment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::startup::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
use crate::state::DEFAULT_LANG_KEY;

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "config.json";

/// Default environment configuration file name
pub const DEFAULT_ENV_FILE: &str = "env.json";

pub const DEFAULT_BFF_URL: &str = "http://localhost:8080/shell-bff/";
pub const DEFAULT_APPLICATION_PATH: &str = "/";
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShellConfig {
    /// Base URL of the shell backend-for-frontend
    pub bff_url: String,
    /// Path the shell is served under; selects the workspace
    pub application_path: String,
    pub retry_delay_ms: u64,
    /// Total fetch attempts per task, including the first
    pub retry_max_attempts: u32,
    /// Fail startup if it has not settled within this many milliseconds
    pub startup_timeout_ms: Option<u64>,
    pub default_language: String,
    /// Key/value environment file for the configuration service. Relative
    /// paths resolve against the config directory.
    pub env_file: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            bff_url: DEFAULT_BFF_URL.to_string(),
            application_path: DEFAULT_APPLICATION_PATH.to_string(),
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            retry_max_attempts: DEFAULT_MAX_ATTEMPTS,
            startup_timeout_ms: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
            env_file: None,
        }
    }
}

impl ShellConfig {
    /// Load `config.json` from `config_dir`, or defaults if it does not exist.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply per-invocation overrides.
    pub fn with_overrides(
        mut self,
        bff_url: Option<String>,
        application_path: Option<String>,
    ) -> Self {
        if let Some(url) = bff_url {
            self.bff_url = url;
        }
        if let Some(path) = application_path {
            self.application_path = path;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.bff_url)
            .with_context(|| format!("Invalid BFF URL: {}", self.bff_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("BFF URL must use http or https: {}", self.bff_url);
        }
        if !self.application_path.starts_with('/') {
            bail!(
                "Application path must start with '/': {}",
                self.application_path
            );
        }
        if self.retry_max_attempts == 0 {
            bail!("retryMaxAttempts must be at least 1");
        }
        if self.startup_timeout_ms == Some(0) {
            bail!("startupTimeoutMs must be greater than 0 when set");
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_millis(self.retry_delay_ms),
            self.retry_max_attempts,
        )
    }

    pub fn startup_timeout(&self) -> Option<Duration> {
        self.startup_timeout_ms.map(Duration::from_millis)
    }

    /// Location of the environment file for the configuration service.
    pub fn env_file_path(&self, config_dir: &Path) -> PathBuf {
        match &self.env_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => config_dir.join(path),
            None => config_dir.join(DEFAULT_ENV_FILE),
        }
    }

    /// Built-in values the configuration service starts from.
    pub fn configuration_defaults(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(
            DEFAULT_LANG_KEY.to_string(),
            self.default_language.clone(),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ShellConfig::load(dir.path()).unwrap();

        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.startup_timeout(), None);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"bffUrl": "https://portal.example.com/bff", "startupTimeoutMs": 15000}"#,
        )
        .unwrap();

        let config = ShellConfig::load(dir.path()).unwrap();
        assert_eq!(config.bff_url, "https://portal.example.com/bff");
        assert_eq!(config.application_path, "/");
        assert_eq!(config.retry_max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.startup_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();

        let err = ShellConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_overrides_win() {
        let config = ShellConfig::default()
            .with_overrides(Some("http://bff:9000/".to_string()), None)
            .with_overrides(None, Some("/admin".to_string()));

        assert_eq!(config.bff_url, "http://bff:9000/");
        assert_eq!(config.application_path, "/admin");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_url = ShellConfig {
            bff_url: "ftp://bff".to_string(),
            ..Default::default()
        };
        assert!(bad_url.validate().is_err());

        let bad_path = ShellConfig {
            application_path: "admin".to_string(),
            ..Default::default()
        };
        assert!(bad_path.validate().is_err());

        let no_attempts = ShellConfig {
            retry_max_attempts: 0,
            ..Default::default()
        };
        assert!(no_attempts.validate().is_err());
    }

    #[test]
    fn test_env_file_path() {
        let dir = Path::new("/etc/portal-shell");
        let mut config = ShellConfig::default();
        assert_eq!(config.env_file_path(dir), dir.join("env.json"));

        config.env_file = Some(PathBuf::from("local/env.json"));
        assert_eq!(config.env_file_path(dir), dir.join("local/env.json"));

        config.env_file = Some(PathBuf::from("/srv/env.json"));
        assert_eq!(config.env_file_path(dir), PathBuf::from("/srv/env.json"));
    }

    #[test]
    fn test_configuration_defaults_carry_language() {
        let config = ShellConfig {
            default_language: "de".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.configuration_defaults().get(DEFAULT_LANG_KEY).map(String::as_str),
            Some("de")
        );
    }
}
