//! Making sure Gerrit has the revision being submitted

use crate::error::{Error, Result};
use crate::repo::LocalRepository;
use crate::review::ReviewService;
use crate::submit::{ProgressCallback, PushStatus};
use crate::types::{Branch, Change, ChangeKey, Commit, SUBMIT_CHANGE_OPTIONS};
use tracing::{debug, info};

/// Outcome of the upload step
#[derive(Debug, Clone)]
pub struct Upload {
    /// Change state after the step (refetched when a push happened)
    pub change: Change,
    /// Whether the commit was pushed
    pub pushed: bool,
}

/// Push `commit` for review unless it is already the current patch set
///
/// After a push the change is fetched again, since mergeability is computed
/// against the new revision. In a dry run the push is only reported.
#[allow(clippy::too_many_arguments)]
pub async fn ensure_uploaded(
    repo: &dyn LocalRepository,
    review: &dyn ReviewService,
    branch: &Branch,
    commit: &Commit,
    key: &ChangeKey,
    change: Change,
    dry_run: bool,
    progress: &dyn ProgressCallback,
) -> Result<Upload> {
    if change.is_current_revision(&commit.hash) {
        debug!("Gerrit already has {} as current revision", commit.hash);
        progress.on_push(commit, PushStatus::AlreadyUploaded).await;
        return Ok(Upload {
            change,
            pushed: false,
        });
    }

    if dry_run {
        progress.on_push(commit, PushStatus::Skipped).await;
        return Ok(Upload {
            change,
            pushed: false,
        });
    }

    info!(
        "Pushing {} (Gerrit has {:?})",
        branch.push_spec(commit),
        change.current_revision
    );
    progress.on_push(commit, PushStatus::Started).await;

    if let Err(e) = repo.push_reference(branch, commit).await {
        progress
            .on_push(commit, PushStatus::Failed(e.to_string()))
            .await;
        return Err(e);
    }
    progress.on_push(commit, PushStatus::Success).await;

    let change = review.get_change(key, SUBMIT_CHANGE_OPTIONS).await?;
    Ok(Upload {
        change,
        pushed: true,
    })
}

/// Fail if Gerrit cannot merge the change's current revision
pub fn check_mergeable(change: &Change) -> Result<()> {
    if change.mergeable {
        Ok(())
    } else {
        Err(Error::NotMergeable)
    }
}
