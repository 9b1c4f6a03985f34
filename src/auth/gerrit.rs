//! Gerrit authentication

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use reqwest::RequestBuilder;
use std::env;
use std::fmt;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Credentials attached to every Gerrit request
#[derive(Clone, PartialEq, Eq)]
pub enum GerritCredentials {
    /// HTTP basic auth with a Gerrit HTTP password
    Basic {
        /// Account user name
        username: String,
        /// Generated HTTP password
        password: String,
    },
    /// Session cookie from a cookie file
    Cookie {
        /// Cookie name
        name: String,
        /// Cookie value
        value: String,
    },
}

impl GerritCredentials {
    /// Attach these credentials to a request
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::Cookie { name, value } => {
                request.header(reqwest::header::COOKIE, format!("{name}={value}"))
            }
        }
    }
}

impl fmt::Debug for GerritCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Cookie { name, .. } => f
                .debug_struct("Cookie")
                .field("name", name)
                .field("value", &"<redacted>")
                .finish(),
        }
    }
}

/// Gerrit authentication configuration
#[derive(Debug, Clone)]
pub struct GerritAuthConfig {
    /// Credentials to send
    pub credentials: GerritCredentials,
    /// Where the credentials were obtained from
    pub source: AuthSource,
}

/// Get Gerrit authentication for `host`
///
/// Priority:
/// 1. `GERRIT_USER` + `GERRIT_PASSWORD` environment variables
/// 2. git cookie file (`http.cookiefile`, else `~/.gitcookies`)
/// 3. `~/.netrc`
pub async fn get_gerrit_auth(host: &str) -> Result<GerritAuthConfig> {
    if let (Ok(username), Ok(password)) = (env::var("GERRIT_USER"), env::var("GERRIT_PASSWORD")) {
        return Ok(GerritAuthConfig {
            credentials: GerritCredentials::Basic { username, password },
            source: AuthSource::EnvVar,
        });
    }

    if let Some(path) = cookie_file_path().await {
        debug!("Reading cookies from {}", path.display());
        if let Ok(contents) = tokio::fs::read_to_string(&path).await {
            if let Some(credentials) = parse_gitcookies(&contents, host) {
                return Ok(GerritAuthConfig {
                    credentials,
                    source: AuthSource::Cookie,
                });
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        if let Ok(contents) = tokio::fs::read_to_string(home.join(".netrc")).await {
            if let Some(credentials) = parse_netrc(&contents, host) {
                return Ok(GerritAuthConfig {
                    credentials,
                    source: AuthSource::Netrc,
                });
            }
        }
    }

    Err(Error::Auth(format!(
        "No Gerrit credentials found for {host}. Set GERRIT_USER and GERRIT_PASSWORD, \
         or add {host} to ~/.gitcookies or ~/.netrc"
    )))
}

async fn cookie_file_path() -> Option<PathBuf> {
    let output = Command::new("git")
        .args(["config", "--path", "--get", "http.cookiefile"])
        .output()
        .await
        .ok();

    if let Some(output) = output.filter(|o| o.status.success()) {
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::home_dir().map(|home| home.join(".gitcookies"))
}

/// Find a cookie for `host` in a Netscape-format cookie file
///
/// A domain also matches its subdomains when the include-subdomains column is
/// `TRUE` or the domain starts with `.`.
pub fn parse_gitcookies(contents: &str, host: &str) -> Option<GerritCredentials> {
    contents.lines().find_map(|line| {
        let line = line.strip_prefix("#HttpOnly_").unwrap_or(line);
        if line.trim().is_empty() || line.starts_with('#') {
            return None;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 7 {
            return None;
        }

        let domain = fields[0].trim_start_matches('.');
        let subdomains = fields[1].eq_ignore_ascii_case("TRUE") || fields[0].starts_with('.');
        let matches = host == domain
            || (subdomains
                && host
                    .strip_suffix(domain)
                    .is_some_and(|prefix| prefix.ends_with('.')));
        if !matches {
            return None;
        }

        Some(GerritCredentials::Cookie {
            name: fields[5].to_string(),
            value: fields[6].trim_end().to_string(),
        })
    })
}

/// Find login and password for `host` in a `.netrc` file
pub fn parse_netrc(contents: &str, host: &str) -> Option<GerritCredentials> {
    let mut tokens = contents.split_whitespace();
    let mut machine: Option<&str> = None;
    let mut login: Option<&str> = None;
    let mut password: Option<&str> = None;

    let found = |machine: Option<&str>, login: Option<&str>, password: Option<&str>| {
        match (machine, login, password) {
            (Some(m), Some(l), Some(p)) if m == host => Some(GerritCredentials::Basic {
                username: l.to_string(),
                password: p.to_string(),
            }),
            _ => None,
        }
    };

    while let Some(token) = tokens.next() {
        match token {
            "machine" => {
                if let Some(credentials) = found(machine, login, password) {
                    return Some(credentials);
                }
                machine = tokens.next();
                login = None;
                password = None;
            }
            "login" => login = tokens.next(),
            "password" => password = tokens.next(),
            _ => {}
        }
    }

    found(machine, login, password)
}
