use std::path::Path;

use anyhow::Result;

use crate::auth::{AuthSessionStore, ACCESS_TOKEN_ENV};

pub async fn run_status(config_dir: &Path) -> Result<()> {
    let session_store = AuthSessionStore::new(config_dir);

    if session_store.is_logged_in() {
        if let Some(session) = session_store.get_session()? {
            println!("✅ Credentials available");
            if session_store.uses_env_token() {
                println!("   Source: {}", ACCESS_TOKEN_ENV);
            } else {
                println!("   Source: {}", session_store.session_path().display());
            }
            println!("   Scopes: {:?}", session.scopes);
        }
    } else if session_store.session_path().exists() {
        println!("⚠️  Session file exists but is invalid.");
        println!("   Run 'portal-shell login --token <TOKEN>' to replace it.");
    } else {
        println!("❌ No credentials found");
        println!(
            "   Run 'portal-shell login --token <TOKEN>' or set {}.",
            ACCESS_TOKEN_ENV
        );
    }

    Ok(())
}
