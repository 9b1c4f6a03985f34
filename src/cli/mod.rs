//! CLI commands
//!
//! Command implementations for the `git-land` binary.

mod auth;
mod progress;
mod style;
mod submit;

pub use auth::{run_auth_setup, run_auth_test};
pub use submit::run_submit;
