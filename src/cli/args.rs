use clap::{Parser, Subcommand};

/// Portal shell - bootstraps a micro-frontend portal from its BFF
#[derive(Parser)]
#[command(name = "portal-shell")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding config.json, env.json and session.json. Defaults to ~/.portal-shell
    #[arg(long, global = true, env = "SHELL_CONFIG_DIR")]
    pub config_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the startup sequence against the BFF
    Start {
        /// Application path the shell is served under
        #[arg(short = 'p', long, env = "SHELL_APPLICATION_PATH")]
        application_path: Option<String>,

        /// Base URL of the shell BFF
        #[arg(long, env = "SHELL_BFF_URL")]
        bff_url: Option<String>,

        /// Print the published state as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Also report which route serves this path
        #[arg(long, value_name = "PATH")]
        resolve: Option<String>,
    },
    /// Save an access token for later runs
    Login {
        /// Bearer token issued by the identity provider
        #[arg(long)]
        token: String,

        /// Scopes granted to the token
        #[arg(long, value_delimiter = ',')]
        scopes: Vec<String>,
    },
    /// Remove the saved access token
    Logout,
    /// Show whether credentials are available
    Status,
    /// Print the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_start() {
        let cli = Cli::try_parse_from([
            "portal-shell",
            "-v",
            "start",
            "--application-path",
            "/admin",
            "--bff-url",
            "http://bff/",
            "--json",
            "--resolve",
            "/admin/users",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Start {
                application_path,
                bff_url,
                json,
                resolve,
            }) => {
                assert_eq!(application_path.as_deref(), Some("/admin"));
                assert_eq!(bff_url.as_deref(), Some("http://bff/"));
                assert!(json);
                assert_eq!(resolve.as_deref(), Some("/admin/users"));
            }
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn test_parse_login_scopes() {
        let cli = Cli::try_parse_from([
            "portal-shell",
            "login",
            "--token",
            "abc",
            "--scopes",
            "openid,profile",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Login { token, scopes }) => {
                assert_eq!(token, "abc");
                assert_eq!(scopes, vec!["openid", "profile"]);
            }
            _ => panic!("expected login"),
        }
    }
}
