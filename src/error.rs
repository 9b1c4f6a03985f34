//! Error types for git-land

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a submission or a supporting command
#[derive(Debug, Error)]
pub enum Error {
    /// Staged or unstaged modifications in the working tree
    #[error("cannot submit: uncommitted changes in the working tree, commit or stash them first")]
    DirtyWorkspace,

    /// Change status not recognized before submit
    #[error("cannot submit: unexpected Gerrit change status {0:?}")]
    UnexpectedStatus(String),

    /// Change is already merged
    #[error("cannot submit: change already submitted, run 'git pull --rebase'")]
    AlreadySubmitted,

    /// Change was abandoned
    #[error("cannot submit: change abandoned")]
    Abandoned,

    /// A required label carries a rejection
    #[error("cannot submit: change has {0} rejection")]
    Rejected(String),

    /// A required label has no approval
    #[error("cannot submit: change missing {0} approval")]
    MissingApproval(String),

    /// Server cannot merge the current revision
    #[error("cannot submit: conflicting changes submitted, run 'git pull --rebase'")]
    NotMergeable,

    /// Submit request was refused
    #[error("cannot submit: {0}")]
    SubmitRejected(String),

    /// Fetching the change failed while waiting for the merge
    #[error("waiting for merge: {0}")]
    Poll(String),

    /// Change still queued after the wait budget was spent
    #[error(
        "cannot submit: timed out waiting for change to be submitted by Gerrit, run 'git pull --rebase' later"
    )]
    SubmitTimeout,

    /// Change ended up in a status other than merged after submit
    #[error("submit error: unexpected post-submit Gerrit change status {0:?}")]
    UnexpectedPostSubmitStatus(String),

    /// A git command failed
    #[error("git {command}: {stderr}")]
    Git {
        /// Arguments passed to git
        command: String,
        /// Trimmed standard error output
        stderr: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gerrit answered with an error status
    #[error("Gerrit API error: {0}")]
    Gerrit(String),

    /// Gerrit has no change for the given identifier
    #[error("change not found on Gerrit: {0}")]
    ChangeNotFound(String),

    /// Malformed JSON from Gerrit
    #[error("invalid Gerrit response: {0}")]
    Json(#[from] serde_json::Error),

    /// Credentials missing or rejected
    #[error("authentication error: {0}")]
    Auth(String),

    /// Could not parse remote URL, git output or similar
    #[error("parse error: {0}")]
    Parse(String),

    /// Named git remote is not configured
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// HEAD does not point at a branch
    #[error("not on a branch (detached HEAD)")]
    DetachedHead,

    /// Branch tracks something other than a branch of the configured remote
    #[error("cannot submit: branch {branch} tracks {upstream}, not a branch of remote {remote}")]
    UpstreamNotRemote {
        /// Local branch name
        branch: String,
        /// Full name of the tracked ref
        upstream: String,
        /// Remote changes are pushed to
        remote: String,
    },

    /// Branch has nothing pending against its upstream
    #[error("cannot submit: no pending change on this branch")]
    NoPendingCommit,

    /// Several pending commits and none chosen
    #[error("cannot submit: {0} changes pending, must specify commit on command line")]
    MultiplePendingCommits(usize),

    /// No pending commit matches the given hash
    #[error("cannot submit: no pending commit matches {0}")]
    CommitNotFound(String),

    /// Hash prefix matches more than one pending commit
    #[error("cannot submit: commit {0} is ambiguous")]
    AmbiguousCommit(String),

    /// Commit message has no Change-Id trailer
    #[error("cannot submit: commit {0} has no Change-Id line")]
    MissingChangeId(String),
}

impl Error {
    /// Build a git command failure from its arguments and stderr
    pub fn git(args: &[&str], stderr: impl AsRef<str>) -> Self {
        Self::Git {
            command: args.join(" "),
            stderr: stderr.as_ref().trim().to_string(),
        }
    }
}
