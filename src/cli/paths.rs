use anyhow::{Context, Result};
use std::path::PathBuf;

/// Default config directory name under the home directory
const CONFIG_DIR_NAME: &str = ".portal-shell";

/// Resolve the config directory, creating it if needed.
pub fn resolve_config_dir(config_dir: Option<String>) -> Result<PathBuf> {
    let dir = match config_dir {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .context("Failed to get home directory")?
            .join(CONFIG_DIR_NAME),
    };

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_dir_is_created() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("nested").join("shell");

        let dir = resolve_config_dir(Some(target.to_string_lossy().into_owned())).unwrap();
        assert_eq!(dir, target);
        assert!(dir.is_dir());
    }
}
