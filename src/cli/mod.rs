mod args;
mod paths;

pub use args::{Cli, Commands};
pub use paths::resolve_config_dir;
