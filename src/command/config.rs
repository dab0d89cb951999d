use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{ShellConfig, CONFIG_FILE};

pub async fn run_config(config_dir: &Path) -> Result<()> {
    let config = ShellConfig::load(config_dir)?;

    println!("# {}", config_dir.join(CONFIG_FILE).display());
    println!(
        "{}",
        serde_json::to_string_pretty(&config).context("Failed to serialize config")?
    );
    if let Err(e) = config.validate() {
        println!("\n⚠️  {:#}", e);
    }

    Ok(())
}
