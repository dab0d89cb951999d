use std::path::Path;

use anyhow::{bail, Result};

use crate::auth::AuthSessionStore;

pub async fn run_login(config_dir: &Path, token: String, scopes: Vec<String>) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        bail!("Access token must not be empty");
    }

    let session_store = AuthSessionStore::with_env_token(config_dir, None);
    if session_store.is_logged_in() {
        println!("⚠️  Replacing the existing session.");
    }

    session_store.save_session(token, &scopes)?;
    println!("✅ Access token saved to {}", session_store.session_path().display());

    Ok(())
}
