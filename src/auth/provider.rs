use std::sync::OnceLock;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use super::session::{AuthSessionStore, SessionData};
use crate::startup::GateResolver;

/// Supplies bearer credentials and signals when authentication is ready.
///
/// Credentials are loaded once; `initialize` resolves the authentication
/// gate so that gated startup tasks may begin fetching.
pub struct AuthProvider {
    store: AuthSessionStore,
    session: OnceLock<SessionData>,
}

impl AuthProvider {
    pub fn new(store: AuthSessionStore) -> Self {
        Self {
            store,
            session: OnceLock::new(),
        }
    }

    /// Provider with a fixed, already-known session.
    #[cfg(test)]
    pub fn with_session(store: AuthSessionStore, session: SessionData) -> Self {
        let provider = Self::new(store);
        provider.keep_session(session);
        provider
    }

    /// Load credentials and resolve `gate` with the outcome.
    pub async fn initialize(&self, gate: GateResolver) {
        info!("🔐 Checking authentication...");
        match self.load() {
            Ok(()) => {
                info!("✅ Authentication credentials found");
                gate.resolve(true);
            }
            Err(e) => {
                error!("❌ {:#}", e);
                error!(
                    "   Please run 'portal-shell login --token <TOKEN>' or set {}",
                    super::session::ACCESS_TOKEN_ENV
                );
                gate.resolve(false);
            }
        }
    }

    fn load(&self) -> Result<()> {
        if self.session.get().is_some() {
            return Ok(());
        }
        let session = self
            .store
            .get_session()
            .context("Failed to read session")?
            .context("Not logged in")?;
        debug!("Session scopes: {:?}", session.scopes);
        self.keep_session(session);
        Ok(())
    }

    /// Credentials are loaded at most once; later sessions are ignored.
    fn keep_session(&self, session: SessionData) {
        if self.session.set(session).is_err() {
            debug!("Session already loaded, keeping the existing credentials");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.get().is_some()
    }

    /// Bearer token, available once authentication has initialized.
    pub fn access_token(&self) -> Option<&str> {
        self.session.get().map(|s| s.access_token.as_str())
    }
}

impl std::fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProvider")
            .field("session_path", &self.store.session_path())
            .field("authenticated", &self.is_authenticated())
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::startup::ReadinessGate;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_initialize_opens_gate_with_credentials() {
        let tmp = tempdir().unwrap();
        let store = AuthSessionStore::with_env_token(tmp.path(), Some("t0ken".to_string()));
        let provider = AuthProvider::new(store);
        let (resolver, gate) = ReadinessGate::new("auth");

        assert!(provider.access_token().is_none());
        provider.initialize(resolver).await;

        assert!(gate.wait().await);
        assert_eq!(provider.access_token(), Some("t0ken"));
    }

    #[tokio::test]
    async fn test_initialize_without_credentials_rejects_gate() {
        let tmp = tempdir().unwrap();
        let provider = AuthProvider::new(AuthSessionStore::with_env_token(tmp.path(), None));
        let (resolver, gate) = ReadinessGate::new("auth");

        provider.initialize(resolver).await;

        assert!(!gate.wait().await);
        assert!(!provider.is_authenticated());
    }

    #[tokio::test]
    async fn test_credentials_are_loaded_once() {
        let tmp = tempdir().unwrap();
        let store = AuthSessionStore::with_env_token(tmp.path(), None);
        store.save_session("first", &[]).unwrap();
        let provider = AuthProvider::new(store);

        let (resolver, gate) = ReadinessGate::new("auth");
        provider.initialize(resolver).await;
        assert!(gate.wait().await);

        AuthSessionStore::with_env_token(tmp.path(), None)
            .save_session("second", &[])
            .unwrap();
        let (resolver, gate) = ReadinessGate::new("auth-again");
        provider.initialize(resolver).await;

        assert!(gate.wait().await);
        assert_eq!(provider.access_token(), Some("first"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let tmp = tempdir().unwrap();
        let provider = AuthProvider::with_session(
            AuthSessionStore::with_env_token(tmp.path(), None),
            SessionData {
                access_token: "secret-token-123".to_string(),
                scopes: vec![],
            },
        );
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret-token-123"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
