//! Change submission engine
//!
//! Handles submitting one approved change:
//! 1. Checks - clean workspace, change status, label approvals
//! 2. Upload - push the revision if Gerrit does not have it, check mergeability
//! 3. Submit - request the merge and wait for Gerrit to finish it
//! 4. Sync - move the local branch to the merged revision

mod execute;
mod gate;
mod progress;
mod reconcile;
mod select;
mod upload;
mod wait;

pub use execute::{submit_change, SubmissionResult, SubmitOptions, SubmitOutcome};
pub use gate::{check_approvals, check_status, check_workspace_clean};
pub use progress::{NoopProgress, Phase, ProgressCallback, PushStatus};
pub use reconcile::{reconcile_branch, ReconcileOutcome, SYNC_DEFERRED};
pub use select::select_commit;
pub use upload::{check_mergeable, ensure_uploaded, Upload};
pub use wait::{wait_for_merge, MergeWait, DEFAULT_MAX_WAIT, DEFAULT_STEPS};
