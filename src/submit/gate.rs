//! Pre-submit checks
//!
//! Everything here is observational: nothing is pushed or changed locally
//! until these pass.

use crate::error::{Error, Result};
use crate::repo::LocalRepository;
use crate::types::{Change, ChangeStatus};
use tracing::{debug, warn};

/// Fail if the working tree has staged or unstaged modifications
///
/// The final branch reset must not be able to destroy or trip over
/// uncommitted work.
pub async fn check_workspace_clean(repo: &dyn LocalRepository) -> Result<()> {
    if repo.has_uncommitted_changes().await? {
        return Err(Error::DirtyWorkspace);
    }
    Ok(())
}

/// Triage the change status before attempting a submit
pub fn check_status(change: &Change) -> Result<()> {
    match &change.status {
        ChangeStatus::New => Ok(()),
        ChangeStatus::Submitted => {
            // An earlier submit was accepted but never merged, usually after a
            // merge failure. The user may have synced since, so retry as NEW.
            debug!(
                "Change {} already SUBMITTED (last updated {:?}), retrying",
                change.number, change.updated
            );
            Ok(())
        }
        ChangeStatus::Merged => Err(Error::AlreadySubmitted),
        ChangeStatus::Abandoned => Err(Error::Abandoned),
        ChangeStatus::Unexpected(status) => Err(Error::UnexpectedStatus(status.clone())),
    }
}

/// Check that every required label is approved and none is rejected
///
/// Gerrit enforces the same rule on submit; checking here gives a clearer
/// message before any upload happens. All labels are inspected and the first
/// failure in label-name order is returned.
pub fn check_approvals(change: &Change) -> Result<()> {
    let mut failures = Vec::new();

    for (name, label) in &change.labels {
        if label.optional {
            continue;
        }
        if let Some(by) = &label.rejected {
            warn!("Label {name} rejected by {by}");
            failures.push(Error::Rejected(name.clone()));
        } else if label.approved.is_none() {
            warn!("Label {name} has no approval");
            failures.push(Error::MissingApproval(name.clone()));
        }
    }

    failures.into_iter().next().map_or(Ok(()), Err)
}
