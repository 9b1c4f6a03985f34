//! Authentication for Gerrit
//!
//! Supports environment variables, git cookie files and `.netrc`.

mod gerrit;

pub use gerrit::{
    get_gerrit_auth, parse_gitcookies, parse_netrc, GerritAuthConfig, GerritCredentials,
};

/// Source of Gerrit credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// `GERRIT_USER` / `GERRIT_PASSWORD` environment variables
    EnvVar,
    /// Cookie file (`http.cookiefile` or `~/.gitcookies`)
    Cookie,
    /// `~/.netrc` entry
    Netrc,
}
