//! Generic key/value configuration for the shell and its remotes.
//!
//! Values come from an `env.json` style file: a flat JSON object whose
//! values are strings (other scalars are stringified). A missing file is not
//! an error; the built-in defaults are used.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use super::Initialize;

/// Key holding the default UI language.
pub const DEFAULT_LANG_KEY: &str = "DEFAULT_LANG";

#[derive(Debug)]
pub struct ConfigurationService {
    source: Option<PathBuf>,
    defaults: BTreeMap<String, String>,
    values: RwLock<BTreeMap<String, String>>,
    initialized: AtomicBool,
}

impl ConfigurationService {
    /// Create a service reading `source` on init, seeded with `defaults`.
    pub fn new(source: Option<PathBuf>, defaults: BTreeMap<String, String>) -> Self {
        Self {
            source,
            values: RwLock::new(defaults.clone()),
            defaults,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn all(&self) -> BTreeMap<String, String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn load_source(&self) -> Result<BTreeMap<String, String>> {
        let mut values = self.defaults.clone();
        let Some(path) = self.source.as_ref() else {
            return Ok(values);
        };
        if !path.exists() {
            debug!("No configuration file at {:?}, using defaults", path);
            return Ok(values);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {:?}", path))?;
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {:?}", path))?;

        for (key, value) in raw {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => continue,
                other @ (serde_json::Value::Bool(_) | serde_json::Value::Number(_)) => {
                    other.to_string()
                }
                other => anyhow::bail!(
                    "Configuration value for {} must be a scalar, got {}",
                    key,
                    other
                ),
            };
            values.insert(key, value);
        }
        Ok(values)
    }
}

#[async_trait]
impl Initialize for ConfigurationService {
    async fn init(&self) -> Result<()> {
        let values = self.load_source()?;
        info!("Configuration loaded ({} entries)", values.len());
        *self.values.write().unwrap_or_else(PoisonError::into_inner) = values;
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn defaults() -> BTreeMap<String, String> {
        BTreeMap::from([(DEFAULT_LANG_KEY.to_string(), "en".to_string())])
    }

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigurationService::new(Some(dir.path().join("env.json")), defaults());

        service.init().await.unwrap();
        assert!(service.is_initialized());
        assert_eq!(service.get(DEFAULT_LANG_KEY).as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("env.json");
        std::fs::write(
            &path,
            r#"{"DEFAULT_LANG": "de", "AUTH_SERVICE": "keycloak", "MAX_TABS": 5, "UNSET": null}"#,
        )
        .unwrap();

        let service = ConfigurationService::new(Some(path), defaults());
        service.init().await.unwrap();

        assert_eq!(service.get(DEFAULT_LANG_KEY).as_deref(), Some("de"));
        assert_eq!(service.get("AUTH_SERVICE").as_deref(), Some("keycloak"));
        assert_eq!(service.get("MAX_TABS").as_deref(), Some("5"));
        assert_eq!(service.get("UNSET"), None);
    }

    #[tokio::test]
    async fn test_malformed_file_fails_init() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("env.json");
        std::fs::write(&path, r#"{"NESTED": {"a": 1}}"#).unwrap();

        let service = ConfigurationService::new(Some(path.clone()), defaults());
        assert!(service.init().await.is_err());
        assert!(!service.is_initialized());

        std::fs::write(&path, "not json").unwrap();
        assert!(service.init().await.is_err());
    }
}
