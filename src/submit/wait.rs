//! Waiting for Gerrit to finish merging a submitted change
//!
//! `wait_for_merge` on the submit call can return while the change is still
//! SUBMITTED, typically when the first merge attempt hit a spurious failure
//! and the change was queued again. The change is polled a fixed number of
//! times with exponentially growing delays until it leaves that state.

use crate::error::{Error, Result};
use crate::review::ReviewService;
use crate::submit::ProgressCallback;
use crate::types::{Change, ChangeKey, ChangeStatus, SUBMIT_CHANGE_OPTIONS};
use std::time::Duration;
use tracing::debug;

/// Default number of polls
pub const DEFAULT_STEPS: u32 = 6;

/// Default delay before the last poll
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(2);

/// Largest supported step count (keeps `2^steps` in range)
const MAX_STEPS: u32 = 16;

/// Polling schedule
///
/// The delay before attempt `i` (1-based) is `max_wait * 2^i / 2^steps`, so the
/// last delay equals `max_wait` and the total stays below `2 * max_wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeWait {
    steps: u32,
    max_wait: Duration,
}

impl Default for MergeWait {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl MergeWait {
    /// Create a schedule, clamping `steps` to `1..=16`
    pub fn new(steps: u32, max_wait: Duration) -> Self {
        Self {
            steps: steps.clamp(1, MAX_STEPS),
            max_wait,
        }
    }

    /// Number of polls
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Delay before the last poll
    pub const fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Delay before poll `attempt` (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let attempt = attempt.min(self.steps);
        self.max_wait * 2u32.pow(attempt) / 2u32.pow(self.steps)
    }

    /// All delays in order
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let schedule = *self;
        (1..=schedule.steps).map(move |i| schedule.delay(i))
    }

    /// Worst-case time spent sleeping
    pub fn total(&self) -> Duration {
        self.delays().sum()
    }
}

/// Poll `key` until it leaves SUBMITTED or the schedule runs out
///
/// Returns the merged change. A failed fetch ends the wait immediately.
pub async fn wait_for_merge(
    review: &dyn ReviewService,
    key: &ChangeKey,
    schedule: &MergeWait,
    progress: &dyn ProgressCallback,
) -> Result<Change> {
    let mut attempt = 0;

    let change = loop {
        attempt += 1;
        let delay = schedule.delay(attempt);
        tokio::time::sleep(delay).await;

        let change = review
            .get_change(key, SUBMIT_CHANGE_OPTIONS)
            .await
            .map_err(|e| Error::Poll(e.to_string()))?;

        debug!(
            "Poll {attempt}/{} after {delay:?}: {}",
            schedule.steps, change.status
        );
        progress.on_poll(attempt, delay, &change.status).await;

        if change.status != ChangeStatus::Submitted || attempt >= schedule.steps {
            break change;
        }
    };

    settle(change)
}

/// Map the status observed after polling to the submission result
fn settle(change: Change) -> Result<Change> {
    match &change.status {
        ChangeStatus::Merged => Ok(change),
        ChangeStatus::Submitted => Err(Error::SubmitTimeout),
        other => Err(Error::UnexpectedPostSubmitStatus(other.to_string())),
    }
}
