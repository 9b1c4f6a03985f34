//! Local repository access
//!
//! The submission engine sees the working copy only through
//! [`LocalRepository`]; [`GitRepository`] implements it on top of the git CLI.

mod git;

pub use git::GitRepository;

use crate::error::Result;
use crate::types::{Branch, Commit};
use async_trait::async_trait;

/// Local repository operations needed to submit a change
#[async_trait]
pub trait LocalRepository: Send + Sync {
    /// The checked-out branch and its upstream
    async fn active_branch(&self) -> Result<Branch>;

    /// Commits on `branch` not yet on its upstream, oldest first
    async fn pending_commits(&self, branch: &Branch) -> Result<Vec<Commit>>;

    /// Whether the index or working tree differ from HEAD
    async fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Update remote-tracking refs
    async fn fetch(&self) -> Result<()>;

    /// Check out `branch`, pointing it at `revision`
    async fn checkout_and_reset(&self, branch: &Branch, revision: &str) -> Result<()>;

    /// Push `commit` to the review ref for `branch`
    async fn push_reference(&self, branch: &Branch, commit: &Commit) -> Result<()>;
}
