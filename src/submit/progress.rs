//! Progress callback trait for interface-agnostic updates
//!
//! This trait allows different interfaces (CLI, editor integrations, etc.) to
//! receive progress updates during a submission.

use crate::types::{ChangeStatus, Commit};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Submission phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Checking the workspace, change status and approvals
    Checking,
    /// Making sure Gerrit has the revision
    Uploading,
    /// Sending the submit request
    Submitting,
    /// Polling until the change leaves SUBMITTED
    WaitingForMerge,
    /// Updating the local branch
    Syncing,
    /// Submission complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Checking => "Checking change",
            Self::Uploading => "Uploading",
            Self::Submitting => "Submitting",
            Self::WaitingForMerge => "Waiting for merge",
            Self::Syncing => "Syncing local branch",
            Self::Complete => "Done",
        })
    }
}

/// Push operation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Push started
    Started,
    /// Push succeeded
    Success,
    /// Gerrit already has this revision
    AlreadyUploaded,
    /// Push skipped because of a dry run
    Skipped,
    /// Push failed with error message
    Failed(String),
}

impl fmt::Display for PushStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("pushing"),
            Self::Success => f.write_str("pushed"),
            Self::AlreadyUploaded => f.write_str("already uploaded"),
            Self::Skipped => f.write_str("would push (dry run)"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates during submission.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called around the upload of the commit
    async fn on_push(&self, commit: &Commit, status: PushStatus);

    /// Called after every poll while waiting for the merge
    async fn on_poll(&self, attempt: u32, delay: Duration, status: &ChangeStatus);

    /// Called for problems that do not fail the submission
    async fn on_warning(&self, message: &str);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_push(&self, _commit: &Commit, _status: PushStatus) {}
    async fn on_poll(&self, _attempt: u32, _delay: Duration, _status: &ChangeStatus) {}
    async fn on_warning(&self, _message: &str) {}
    async fn on_message(&self, _message: &str) {}
}
