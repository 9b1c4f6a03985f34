//! Gerrit server detection from remote URLs

use crate::error::{Error, Result};
use crate::types::GerritConfig;
use regex::Regex;

const GOOGLESOURCE_SUFFIX: &str = ".googlesource.com";

/// Map a git host to the host serving its Gerrit instance
///
/// `*.googlesource.com` repositories are reviewed on the `-review` sibling
/// host; everything else serves git and Gerrit from the same name.
pub fn detect_gerrit_host(git_host: &str) -> String {
    match git_host.strip_suffix(GOOGLESOURCE_SUFFIX) {
        Some(name) if !name.ends_with("-review") => {
            format!("{name}-review{GOOGLESOURCE_SUFFIX}")
        }
        _ => git_host.to_string(),
    }
}

/// Parse Gerrit base URL and project from a remote URL
///
/// `host_override` (from `GERRIT_HOST`) replaces the detected server. It may be
/// a bare host name or a full URL.
pub fn parse_gerrit_config(remote_url: &str, host_override: Option<&str>) -> Result<GerritConfig> {
    let (base_url, path) = split_remote_url(remote_url)?;

    let project = normalize_project(&path);
    if project.is_empty() {
        return Err(Error::Parse(format!(
            "no project path in remote URL: {remote_url}"
        )));
    }

    let url = match host_override {
        Some(h) if h.contains("://") => h.trim_end_matches('/').to_string(),
        Some(h) => format!("https://{}", h.trim_end_matches('/')),
        None => base_url,
    };

    Ok(GerritConfig { url, project })
}

/// Split a remote URL into the Gerrit base URL and the raw repository path
fn split_remote_url(remote_url: &str) -> Result<(String, String)> {
    // scp-like syntax: [user@]host:path
    if !remote_url.contains("://") {
        let re_scp = Regex::new(r"^(?:[^@/]+@)?([^:/]+):(.+)$").unwrap();
        let caps = re_scp
            .captures(remote_url)
            .ok_or_else(|| Error::Parse(format!("cannot parse remote URL: {remote_url}")))?;
        let host = detect_gerrit_host(&caps[1]);
        return Ok((format!("https://{host}"), caps[2].to_string()));
    }

    let url = url::Url::parse(remote_url)
        .map_err(|e| Error::Parse(format!("cannot parse remote URL {remote_url}: {e}")))?;
    let git_host = url
        .host_str()
        .ok_or_else(|| Error::Parse(format!("no host in remote URL: {remote_url}")))?;
    let host = detect_gerrit_host(git_host);

    // Gerrit's ssh daemon port says nothing about where HTTP is served.
    let base_url = match (url.scheme(), url.port()) {
        ("http", Some(port)) => format!("http://{host}:{port}"),
        ("http", None) => format!("http://{host}"),
        ("https", Some(port)) => format!("https://{host}:{port}"),
        _ => format!("https://{host}"),
    };

    Ok((base_url, url.path().to_string()))
}

fn normalize_project(path: &str) -> String {
    let path = path.trim_matches('/');
    let path = path.strip_prefix("a/").unwrap_or(path);
    path.strip_suffix(".git").unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_googlesource_review_host() {
        assert_eq!(
            detect_gerrit_host("go.googlesource.com"),
            "go-review.googlesource.com"
        );
        assert_eq!(
            detect_gerrit_host("go-review.googlesource.com"),
            "go-review.googlesource.com"
        );
        assert_eq!(detect_gerrit_host("gerrit.example.com"), "gerrit.example.com");
    }

    #[test]
    fn test_parse_https_googlesource() {
        let config = parse_gerrit_config("https://go.googlesource.com/go", None).unwrap();
        assert_eq!(config.url, "https://go-review.googlesource.com");
        assert_eq!(config.project, "go");
    }

    #[test]
    fn test_parse_authenticated_path_and_git_suffix() {
        let config =
            parse_gerrit_config("https://gerrit.example.com/a/platform/build.git", None).unwrap();
        assert_eq!(config.url, "https://gerrit.example.com");
        assert_eq!(config.project, "platform/build");
    }

    #[test]
    fn test_parse_ssh_drops_port() {
        let config =
            parse_gerrit_config("ssh://jdoe@gerrit.example.com:29418/tools", None).unwrap();
        assert_eq!(config.url, "https://gerrit.example.com");
        assert_eq!(config.project, "tools");
    }

    #[test]
    fn test_parse_scp_like() {
        let config = parse_gerrit_config("git@gerrit.example.com:group/repo.git", None).unwrap();
        assert_eq!(config.url, "https://gerrit.example.com");
        assert_eq!(config.project, "group/repo");
    }

    #[test]
    fn test_parse_http_keeps_scheme_and_port() {
        let config = parse_gerrit_config("http://localhost:8080/demo", None).unwrap();
        assert_eq!(config.url, "http://localhost:8080");
        assert_eq!(config.project, "demo");
    }

    #[test]
    fn test_host_override() {
        let config =
            parse_gerrit_config("https://go.googlesource.com/go", Some("review.internal")).unwrap();
        assert_eq!(config.url, "https://review.internal");
        assert_eq!(config.project, "go");

        let config = parse_gerrit_config(
            "https://go.googlesource.com/go",
            Some("http://127.0.0.1:9000/"),
        )
        .unwrap();
        assert_eq!(config.url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_missing_project_is_error() {
        assert!(matches!(
            parse_gerrit_config("https://gerrit.example.com/", None),
            Err(Error::Parse(_))
        ));
    }
}
