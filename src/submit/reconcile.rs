//! Bringing the local branch in line with the merged change

use crate::repo::LocalRepository;
use crate::types::Branch;
use tracing::{info, warn};

/// What happened to the local branch after a successful merge
///
/// None of these is a failure: by the time reconciliation runs, the change is
/// merged on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Branch now points at the merged revision
    Synced {
        /// Revision the branch was reset to
        revision: String,
    },
    /// Other local commits remain; the user should sync manually
    Deferred(String),
    /// Automatic sync failed; manual recovery hint
    Warning(String),
}

impl ReconcileOutcome {
    /// Text to show the user, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Synced { .. } => None,
            Self::Deferred(msg) | Self::Warning(msg) => Some(msg),
        }
    }
}

/// Deferral shown when more commits are stacked on the branch
pub const SYNC_DEFERRED: &str = "submit succeeded; run 'git pull --rebase' to sync";

fn sync_failed_hint(branch: &Branch) -> String {
    format!(
        "submit succeeded, but cannot sync local branch\n\
         \trun 'git pull --rebase' to sync, or\n\
         \trun 'git checkout {upstream} && git branch -D {name}' to discard local branch",
        upstream = branch.origin_branch(),
        name = branch.name,
    )
}

/// Sync the branch to the merged revision when that is unambiguous
///
/// `pending_count` is the number of pending commits observed before the
/// submission began. Only a branch whose sole pending commit was the one just
/// merged is reset; anything else is left for the user.
pub async fn reconcile_branch(
    repo: &dyn LocalRepository,
    branch: &Branch,
    pending_count: usize,
    merged_revision: Option<&str>,
) -> ReconcileOutcome {
    if let Err(e) = repo.fetch().await {
        warn!("Fetch after submit failed: {e}");
        return ReconcileOutcome::Warning(sync_failed_hint(branch));
    }

    if pending_count != 1 {
        info!("{pending_count} pending commits on {}, not resetting", branch.name);
        return ReconcileOutcome::Deferred(SYNC_DEFERRED.to_string());
    }

    let Some(revision) = merged_revision else {
        warn!("Merged change reported no current revision");
        return ReconcileOutcome::Warning(sync_failed_hint(branch));
    };

    match repo.checkout_and_reset(branch, revision).await {
        Ok(()) => {
            info!("Reset {} to {revision}", branch.name);
            ReconcileOutcome::Synced {
                revision: revision.to_string(),
            }
        }
        Err(e) => {
            warn!("Cannot reset {} to {revision}: {e}", branch.name);
            ReconcileOutcome::Warning(sync_failed_hint(branch))
        }
    }
}
