//! Core types for git-land

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// A local commit pending against the branch's upstream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commit {
    /// Full commit hash (hex)
    pub hash: String,
    /// First line of the commit message
    pub subject: String,
    /// Value of the `Change-Id:` trailer, if any
    pub change_id: Option<String>,
}

impl Commit {
    /// Abbreviated hash for display
    pub fn short_hash(&self) -> &str {
        &self.hash[..7.min(self.hash.len())]
    }
}

/// A local git branch and the upstream it tracks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    /// Local branch name
    pub name: String,
    /// Remote the upstream belongs to (e.g., "origin")
    pub remote: String,
    /// Upstream remote-tracking branch in short form (e.g., "origin/master")
    pub upstream: String,
}

impl Branch {
    /// Upstream branch name on the remote, without the remote prefix
    ///
    /// Only a `<remote>/` prefix is stripped; slashes inside the branch name
    /// are kept.
    pub fn origin_branch(&self) -> &str {
        self.upstream
            .strip_prefix(self.remote.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.upstream)
    }

    /// Where a commit must be pushed for Gerrit to pick it up for review
    pub fn push_spec(&self, commit: &Commit) -> PushSpec {
        PushSpec {
            revision: commit.hash.clone(),
            target_ref: format!("refs/for/{}", self.origin_branch()),
        }
    }

    /// Gerrit identifier of the change mirroring `commit`
    pub fn change_key(&self, project: &str, commit: &Commit) -> Result<ChangeKey> {
        let change_id = commit
            .change_id
            .clone()
            .ok_or_else(|| Error::MissingChangeId(commit.short_hash().to_string()))?;

        Ok(ChangeKey {
            project: project.to_string(),
            branch: self.origin_branch().to_string(),
            change_id,
        })
    }
}

/// A `<revision>:<ref>` refspec for `git push`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSpec {
    /// Commit hash being pushed
    pub revision: String,
    /// Destination ref on the remote
    pub target_ref: String,
}

impl fmt::Display for PushSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.revision, self.target_ref)
    }
}

/// Fully qualified Gerrit change identifier (`project~branch~Change-Id`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeKey {
    /// Gerrit project
    pub project: String,
    /// Target branch on Gerrit
    pub branch: String,
    /// `I...` Change-Id
    pub change_id: String,
}

impl fmt::Display for ChangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}~{}~{}",
            urlencoding::encode(&self.project),
            urlencoding::encode(&self.branch),
            urlencoding::encode(&self.change_id)
        )
    }
}

/// Status of a change as reported by Gerrit
///
/// Unknown values are kept verbatim so callers can fail on them explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangeStatus {
    /// Open for review
    New,
    /// Submit requested but not completed
    Submitted,
    /// Merged into the target branch
    Merged,
    /// Abandoned by its owner
    Abandoned,
    /// Anything else the server reports
    Unexpected(String),
}

impl ChangeStatus {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "NEW",
            Self::Submitted => "SUBMITTED",
            Self::Merged => "MERGED",
            Self::Abandoned => "ABANDONED",
            Self::Unexpected(s) => s,
        }
    }
}

impl From<&str> for ChangeStatus {
    fn from(s: &str) -> Self {
        match s {
            "NEW" => Self::New,
            "SUBMITTED" => Self::Submitted,
            "MERGED" => Self::Merged,
            "ABANDONED" => Self::Abandoned,
            other => Self::Unexpected(other.to_string()),
        }
    }
}

impl From<String> for ChangeStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ChangeStatus> for String {
    fn from(status: ChangeStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval state of one label on a change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label does not block submission
    pub optional: bool,
    /// Who approved, if anyone
    pub approved: Option<String>,
    /// Who rejected, if anyone
    pub rejected: Option<String>,
}

/// A Gerrit change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    /// Legacy numeric id
    pub number: u64,
    /// Gerrit project
    pub project: String,
    /// Target branch
    pub branch: String,
    /// `I...` Change-Id
    pub change_id: String,
    /// Subject line
    pub subject: String,
    /// Current status
    pub status: ChangeStatus,
    /// Hash of the current patch set
    pub current_revision: Option<String>,
    /// Whether the server can merge the current revision
    pub mergeable: bool,
    /// Labels by name, sorted
    pub labels: BTreeMap<String, Label>,
    /// Last modification time
    pub updated: Option<DateTime<Utc>>,
}

impl Change {
    /// Whether `hash` is the patch set Gerrit currently has
    pub fn is_current_revision(&self, hash: &str) -> bool {
        self.current_revision.as_deref() == Some(hash)
    }
}

/// Extra detail requested when fetching a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOption {
    /// Label approvals and rejections
    Labels,
    /// Hash of the current patch set
    CurrentRevision,
}

impl ChangeOption {
    /// Query parameter value understood by Gerrit
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Labels => "LABELS",
            Self::CurrentRevision => "CURRENT_REVISION",
        }
    }
}

/// Options used at every decision point of a submission
pub const SUBMIT_CHANGE_OPTIONS: &[ChangeOption] =
    &[ChangeOption::Labels, ChangeOption::CurrentRevision];

/// Gerrit server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GerritConfig {
    /// Base URL (scheme + host, no trailing slash)
    pub url: String,
    /// Project name on the server
    pub project: String,
}

impl GerritConfig {
    /// Host part of the base URL
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(ToString::to_string))
    }

    /// Web URL of a change
    pub fn change_url(&self, number: u64) -> String {
        format!("{}/c/{}/+/{number}", self.url, self.project)
    }
}
