//! Mock local repository for testing
//!
//! These are test utilities - not every test binary uses all of them.

#![allow(dead_code)]

use async_trait::async_trait;
use git_land::error::{Error, Result};
use git_land::repo::LocalRepository;
use git_land::types::{Branch, Commit};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory repository with one active branch
///
/// The branch pointer starts at the newest pending commit and only moves on
/// `checkout_and_reset`.
pub struct MockRepository {
    branch: Branch,
    pending: Vec<Commit>,
    dirty: AtomicBool,
    head: Mutex<String>,
    // Call tracking
    pushes: Mutex<Vec<String>>,
    resets: Mutex<Vec<String>>,
    fetches: AtomicUsize,
    // Error injection
    error_on_push: Mutex<Option<String>>,
    error_on_reset: Mutex<Option<String>>,
    error_on_fetch: Mutex<Option<String>>,
}

impl MockRepository {
    /// Create a repository whose branch has `pending` commits (oldest first)
    pub fn new(branch: Branch, pending: Vec<Commit>) -> Self {
        let head = pending
            .last()
            .map(|c| c.hash.clone())
            .unwrap_or_else(|| "0000000".to_string());
        Self {
            branch,
            pending,
            dirty: AtomicBool::new(false),
            head: Mutex::new(head),
            pushes: Mutex::new(Vec::new()),
            resets: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            error_on_push: Mutex::new(None),
            error_on_reset: Mutex::new(None),
            error_on_fetch: Mutex::new(None),
        }
    }

    /// Pretend the working tree has uncommitted changes
    pub fn make_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // === Error injection methods ===

    /// Make `push_reference` fail
    pub fn fail_push(&self, msg: &str) {
        *self.error_on_push.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `checkout_and_reset` fail
    pub fn fail_reset(&self, msg: &str) {
        *self.error_on_reset.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `fetch` fail
    pub fn fail_fetch(&self, msg: &str) {
        *self.error_on_fetch.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Current branch pointer
    pub fn head(&self) -> String {
        self.head.lock().unwrap().clone()
    }

    /// Push specs pushed, in order
    pub fn pushes(&self) -> Vec<String> {
        self.pushes.lock().unwrap().clone()
    }

    /// Revisions the branch was reset to
    pub fn resets(&self) -> Vec<String> {
        self.resets.lock().unwrap().clone()
    }

    /// Number of fetches
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalRepository for MockRepository {
    async fn active_branch(&self) -> Result<Branch> {
        Ok(self.branch.clone())
    }

    async fn pending_commits(&self, _branch: &Branch) -> Result<Vec<Commit>> {
        Ok(self.pending.clone())
    }

    async fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(self.dirty.load(Ordering::SeqCst))
    }

    async fn fetch(&self) -> Result<()> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = self.error_on_fetch.lock().unwrap().as_ref() {
            return Err(Error::git(&["fetch"], msg));
        }
        Ok(())
    }

    async fn checkout_and_reset(&self, branch: &Branch, revision: &str) -> Result<()> {
        self.resets.lock().unwrap().push(revision.to_string());
        if let Some(msg) = self.error_on_reset.lock().unwrap().as_ref() {
            return Err(Error::git(&["checkout", "-B", &branch.name], msg));
        }
        *self.head.lock().unwrap() = revision.to_string();
        Ok(())
    }

    async fn push_reference(&self, branch: &Branch, commit: &Commit) -> Result<()> {
        self.pushes
            .lock()
            .unwrap()
            .push(branch.push_spec(commit).to_string());
        if let Some(msg) = self.error_on_push.lock().unwrap().as_ref() {
            return Err(Error::git(&["push"], msg));
        }
        Ok(())
    }
}
