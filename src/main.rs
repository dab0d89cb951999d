use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod api;
mod auth;
mod cli;
mod command;
mod config;
mod domain;
mod initializers;
mod startup;
mod state;

use cli::{resolve_config_dir, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        // No command specified, show help
        eprintln!("No command specified. Use --help for usage information.");
        eprintln!("Use 'portal-shell start' to run the startup sequence.");
        return Ok(());
    };

    let config_dir = resolve_config_dir(cli.config_dir)?;

    match command {
        Commands::Start {
            application_path,
            bff_url,
            json,
            resolve,
        } => command::run_start(&config_dir, application_path, bff_url, json, resolve).await,
        Commands::Login { token, scopes } => command::run_login(&config_dir, token, scopes).await,
        Commands::Logout => command::run_logout(&config_dir).await,
        Commands::Status => command::run_status(&config_dir).await,
        Commands::Config => command::run_config(&config_dir).await,
    }
}
