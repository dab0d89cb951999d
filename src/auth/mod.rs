//! Authentication collaborator: bearer credentials and the auth readiness gate.

mod provider;
mod session;

pub use provider::AuthProvider;
#[cfg(test)]
pub use session::SessionData;
pub use session::{AuthSessionStore, ACCESS_TOKEN_ENV};
