//! Session storage for bearer credentials.
//!
//! The shell does not run an interactive login flow itself; a token obtained
//! from the identity provider is either passed through the environment or
//! saved once with `portal-shell login --token`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable holding a bearer token, preferred over the session file
pub const ACCESS_TOKEN_ENV: &str = "SHELL_ACCESS_TOKEN";

/// Default scopes for a session saved without explicit scopes
pub const DEFAULT_SCOPES: &[&str] = &["openid"];

/// Session data structure stored in session.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub access_token: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Authentication session store
///
/// Manages session persistence in `<config dir>/session.json`.
pub struct AuthSessionStore {
    session_path: PathBuf,
    env_token: Option<String>,
}

impl AuthSessionStore {
    /// Create a store in `config_dir`, honouring `SHELL_ACCESS_TOKEN`.
    pub fn new(config_dir: &Path) -> Self {
        let env_token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self::with_env_token(config_dir, env_token)
    }

    /// Create a store with an explicit environment token (or none).
    pub fn with_env_token(config_dir: &Path, env_token: Option<String>) -> Self {
        Self {
            session_path: config_dir.join("session.json"),
            env_token,
        }
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    /// Whether credentials come from the environment rather than the file
    pub fn uses_env_token(&self) -> bool {
        self.env_token.is_some()
    }

    /// Check whether credentials are available
    pub fn is_logged_in(&self) -> bool {
        matches!(self.get_session(), Ok(Some(_)))
    }

    /// Parse session data from JSON string
    fn parse_session_from_string(raw: &str) -> Option<SessionData> {
        match serde_json::from_str::<SessionData>(raw) {
            Ok(session) if !session.access_token.trim().is_empty() => Some(session),
            Ok(_) => {
                warn!("Session data has an empty access token");
                None
            }
            Err(e) => {
                warn!("Failed to parse session JSON: {}", e);
                None
            }
        }
    }

    /// Get the current session
    ///
    /// Priority:
    /// 1. SHELL_ACCESS_TOKEN environment variable
    /// 2. session.json file
    pub fn get_session(&self) -> Result<Option<SessionData>> {
        if let Some(token) = &self.env_token {
            debug!("Using access token from {}", ACCESS_TOKEN_ENV);
            return Ok(Some(SessionData {
                access_token: token.clone(),
                scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            }));
        }

        if !self.session_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.session_path)
            .with_context(|| format!("Failed to read session file: {:?}", self.session_path))?;

        Ok(Self::parse_session_from_string(&content))
    }

    /// Save a new session
    pub fn save_session(&self, access_token: &str, scopes: &[String]) -> Result<()> {
        let scopes = if scopes.is_empty() {
            DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
        } else {
            scopes.to_vec()
        };
        let session = SessionData {
            access_token: access_token.to_string(),
            scopes,
        };

        let content =
            serde_json::to_string_pretty(&session).context("Failed to serialize session data")?;

        std::fs::write(&self.session_path, content)
            .with_context(|| format!("Failed to write session file: {:?}", self.session_path))?;

        info!("Session saved successfully");
        debug!("Session saved to {:?}", self.session_path);

        Ok(())
    }

    /// Remove the current session
    pub fn remove_session(&self) -> Result<()> {
        if self.session_path.exists() {
            std::fs::remove_file(&self.session_path).with_context(|| {
                format!("Failed to remove session file: {:?}", self.session_path)
            })?;
        }

        info!("Session removed successfully");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_session_store_empty() {
        let tmp = tempdir().unwrap();
        let store = AuthSessionStore::with_env_token(tmp.path(), None);
        assert!(!store.is_logged_in());
        assert!(store.get_session().unwrap().is_none());
    }

    #[test]
    fn test_env_token_takes_priority() {
        let tmp = tempdir().unwrap();
        let store = AuthSessionStore::with_env_token(tmp.path(), Some("env-token".to_string()));
        store.save_session("file-token", &[]).unwrap();

        let session = store.get_session().unwrap().unwrap();
        assert_eq!(session.access_token, "env-token");
    }

    #[test]
    fn test_session_save_and_load() {
        let tmp = tempdir().unwrap();
        let store = AuthSessionStore::with_env_token(tmp.path(), None);

        store.save_session("test_token", &[]).unwrap();

        let session = store.get_session().unwrap().unwrap();
        assert_eq!(session.access_token, "test_token");
        assert_eq!(session.scopes, vec!["openid"]);
        assert!(store.is_logged_in());
    }

    #[test]
    fn test_session_remove() {
        let tmp = tempdir().unwrap();
        let store = AuthSessionStore::with_env_token(tmp.path(), None);

        store.save_session("test_token", &[]).unwrap();
        assert!(store.session_path().exists());

        store.remove_session().unwrap();
        assert!(!store.session_path().exists());
        assert!(!store.is_logged_in());
    }

    #[test]
    fn test_blank_token_in_file_is_rejected() {
        let tmp = tempdir().unwrap();
        let store = AuthSessionStore::with_env_token(tmp.path(), None);
        std::fs::write(store.session_path(), r#"{"accessToken": "  "}"#).unwrap();
        assert!(store.get_session().unwrap().is_none());
    }
}
