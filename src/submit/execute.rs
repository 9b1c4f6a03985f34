//! Submission pipeline
//!
//! Runs one submission from workspace checks to local sync. Every step before
//! the merge is observed can abort the run; none of them touches local state,
//! so aborting needs no cleanup.

use crate::error::{Error, Result};
use crate::repo::LocalRepository;
use crate::review::ReviewService;
use crate::submit::gate::{check_approvals, check_status, check_workspace_clean};
use crate::submit::reconcile::{reconcile_branch, ReconcileOutcome};
use crate::submit::select::select_commit;
use crate::submit::upload::{check_mergeable, ensure_uploaded};
use crate::submit::wait::{wait_for_merge, MergeWait};
use crate::submit::{Phase, ProgressCallback};
use crate::types::{Branch, Change, Commit, SUBMIT_CHANGE_OPTIONS};
use tracing::info;

/// Knobs for a submission
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmitOptions {
    /// Run all checks but stop before pushing or submitting
    pub dry_run: bool,
    /// Polling schedule after the submit request
    pub merge_wait: MergeWait,
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Dry run stopped before the submit request
    StoppedBeforeSubmit,
    /// The change is merged
    Merged {
        /// What happened to the local branch
        reconcile: ReconcileOutcome,
    },
}

/// Result of a successful submission
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    /// Branch the commit was on
    pub branch: Branch,
    /// Commit that was submitted
    pub commit: Commit,
    /// Last observed state of the change
    pub change: Change,
    /// Whether the commit had to be pushed first
    pub pushed: bool,
    /// How the run ended
    pub outcome: SubmitOutcome,
}

/// Submit one change from the active branch
///
/// `target` selects a pending commit by hash prefix; without it the branch
/// must have exactly one pending commit.
pub async fn submit_change(
    repo: &dyn LocalRepository,
    review: &dyn ReviewService,
    target: Option<&str>,
    options: &SubmitOptions,
    progress: &dyn ProgressCallback,
) -> Result<SubmissionResult> {
    progress.on_phase(Phase::Checking).await;

    let branch = repo.active_branch().await?;
    check_workspace_clean(repo).await?;

    let pending = repo.pending_commits(&branch).await?;
    let commit = select_commit(&pending, target)?.clone();
    let key = branch.change_key(&review.config().project, &commit)?;

    info!("Submitting {} ({}) as {key}", commit.short_hash(), commit.subject);

    let change = review.get_change(&key, SUBMIT_CHANGE_OPTIONS).await?;
    check_status(&change)?;
    check_approvals(&change)?;

    progress.on_phase(Phase::Uploading).await;
    let upload = ensure_uploaded(
        repo,
        review,
        &branch,
        &commit,
        &key,
        change,
        options.dry_run,
        progress,
    )
    .await?;
    check_mergeable(&upload.change)?;

    if options.dry_run {
        progress.on_message("Dry run - stopped before submit").await;
        return Ok(SubmissionResult {
            branch,
            commit,
            change: upload.change,
            pushed: false,
            outcome: SubmitOutcome::StoppedBeforeSubmit,
        });
    }

    progress.on_phase(Phase::Submitting).await;
    review.submit(&key, true).await.map_err(|e| match e {
        Error::SubmitRejected(_) => e,
        other => Error::SubmitRejected(other.to_string()),
    })?;

    progress.on_phase(Phase::WaitingForMerge).await;
    let merged = wait_for_merge(review, &key, &options.merge_wait, progress).await?;

    info!(
        "Change {} merged at {:?}",
        merged.number, merged.current_revision
    );

    progress.on_phase(Phase::Syncing).await;
    let reconcile = reconcile_branch(
        repo,
        &branch,
        pending.len(),
        merged.current_revision.as_deref(),
    )
    .await;
    if let Some(message) = reconcile.message() {
        progress.on_warning(message).await;
    }

    progress.on_phase(Phase::Complete).await;

    Ok(SubmissionResult {
        branch,
        commit,
        change: merged,
        pushed: upload.pushed,
        outcome: SubmitOutcome::Merged { reconcile },
    })
}
