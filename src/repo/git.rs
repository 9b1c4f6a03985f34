//! git CLI backed repository

use crate::error::{Error, Result};
use crate::repo::LocalRepository;
use crate::types::{Branch, Commit};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::debug;

/// Record separator between commits in `git log` output
const RECORD_SEP: char = '\x1e';

/// Field separator between hash and message
const FIELD_SEP: char = '\0';

/// Upstream branch assumed when the branch tracks nothing
const DEFAULT_UPSTREAM_BRANCH: &str = "master";

fn change_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^Change-Id:[ \t]*(I[0-9a-fA-F]{8,})[ \t]*$")
            .expect("hardcoded Change-Id pattern is valid")
    })
}

/// Repository driven through the `git` binary
#[derive(Debug, Clone)]
pub struct GitRepository {
    path: PathBuf,
    remote: String,
}

impl GitRepository {
    /// Open the repository containing `path`, talking to `remote`
    pub async fn open(path: &Path, remote: &str) -> Result<Self> {
        let repo = Self {
            path: path.to_path_buf(),
            remote: remote.to_string(),
        };
        let top = repo.run_git(&["rev-parse", "--show-toplevel"]).await?;
        Ok(Self {
            path: PathBuf::from(top),
            ..repo
        })
    }

    /// Work tree root
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remote used for fetch and push
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Configured URL of the remote
    pub async fn remote_url(&self) -> Result<String> {
        let key = format!("remote.{}.url", self.remote);
        self.run_git(&["config", "--get", &key])
            .await
            .map_err(|_| Error::RemoteNotFound(self.remote.clone()))
    }

    /// Run git and return trimmed stdout
    async fn run_git(&self, args: &[&str]) -> Result<String> {
        debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .output()
            .await
            .map_err(|e| Error::git(args, e.to_string()))?;

        if !output.status.success() {
            return Err(Error::git(args, String::from_utf8_lossy(&output.stderr)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Remote-tracking branch `name` is based on, in `<remote>/<branch>` form
    ///
    /// Falls back to the remote's HEAD, then `<remote>/master`, when nothing is
    /// tracked. Tracking a local branch or another remote's branch is an error,
    /// since the Gerrit branch could not be derived from it.
    async fn upstream_of(&self, name: &str) -> Result<String> {
        let tracking = format!("{name}@{{u}}");
        let remote_head = format!("refs/remotes/{}/HEAD", self.remote);

        let full = match self
            .run_git(&["rev-parse", "--symbolic-full-name", &tracking])
            .await
        {
            Ok(full) if !full.is_empty() => full,
            _ => match self
                .run_git(&["symbolic-ref", "--quiet", &remote_head])
                .await
            {
                Ok(full) => full,
                Err(_) => return Ok(format!("{}/{DEFAULT_UPSTREAM_BRANCH}", self.remote)),
            },
        };

        remote_tracking_name(&full, &self.remote).ok_or_else(|| Error::UpstreamNotRemote {
            branch: name.to_string(),
            upstream: full.clone(),
            remote: self.remote.clone(),
        })
    }
}

/// Shorten `refs/remotes/<remote>/<branch>` to `<remote>/<branch>`
fn remote_tracking_name(full_ref: &str, remote: &str) -> Option<String> {
    let branch = full_ref
        .strip_prefix("refs/remotes/")?
        .strip_prefix(remote)?
        .strip_prefix('/')?;
    (!branch.is_empty() && branch != "HEAD").then(|| format!("{remote}/{branch}"))
}

/// Parse `git log --format=%H%x00%B%x1e` output into commits
fn parse_pending_log(output: &str) -> Vec<Commit> {
    output
        .split(RECORD_SEP)
        .filter_map(|record| {
            let record = record.trim_start_matches(['\n', '\r']);
            let (hash, message) = record.split_once(FIELD_SEP)?;
            let hash = hash.trim();
            if hash.is_empty() {
                return None;
            }

            // The trailer block comes last, so the final match wins.
            let change_id = change_id_regex()
                .captures_iter(message)
                .last()
                .map(|c| c[1].to_string());

            Some(Commit {
                hash: hash.to_string(),
                subject: message.lines().next().unwrap_or_default().trim().to_string(),
                change_id,
            })
        })
        .collect()
}

#[async_trait]
impl LocalRepository for GitRepository {
    async fn active_branch(&self) -> Result<Branch> {
        let name = self
            .run_git(&["symbolic-ref", "--quiet", "--short", "HEAD"])
            .await
            .map_err(|_| Error::DetachedHead)?;
        let upstream = self.upstream_of(&name).await?;

        debug!("Active branch {name} tracking {upstream}");

        Ok(Branch {
            name,
            remote: self.remote.clone(),
            upstream,
        })
    }

    async fn pending_commits(&self, branch: &Branch) -> Result<Vec<Commit>> {
        let range = format!("{}..refs/heads/{}", branch.upstream, branch.name);
        let output = self
            .run_git(&["log", "--reverse", "--format=%H%x00%B%x1e", &range, "--"])
            .await?;
        Ok(parse_pending_log(&output))
    }

    async fn has_uncommitted_changes(&self) -> Result<bool> {
        let status = self
            .run_git(&["status", "--porcelain", "--untracked-files=no"])
            .await?;
        Ok(!status.is_empty())
    }

    async fn fetch(&self) -> Result<()> {
        self.run_git(&["fetch", "-q", &self.remote]).await?;
        Ok(())
    }

    async fn checkout_and_reset(&self, branch: &Branch, revision: &str) -> Result<()> {
        self.run_git(&["checkout", "-q", "-B", &branch.name, revision, "--"])
            .await?;
        Ok(())
    }

    async fn push_reference(&self, branch: &Branch, commit: &Commit) -> Result<()> {
        let spec = branch.push_spec(commit).to_string();
        self.run_git(&["push", "-q", &self.remote, &spec]).await?;
        Ok(())
    }
}
