use std::path::Path;

use anyhow::Result;

use crate::auth::AuthSessionStore;

pub async fn run_logout(config_dir: &Path) -> Result<()> {
    let session_store = AuthSessionStore::with_env_token(config_dir, None);

    if !session_store.session_path().exists() {
        println!("You are not logged in.");
        return Ok(());
    }

    session_store.remove_session()?;
    println!("✅ Session removed.");

    Ok(())
}
