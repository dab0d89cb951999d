mod config;
mod login;
mod logout;
mod start;
mod status;

pub use config::run_config;
pub use login::run_login;
pub use logout::run_logout;
pub use start::run_start;
pub use status::run_status;
