//! Choosing the commit to submit

use crate::error::{Error, Result};
use crate::types::Commit;

/// Pick the pending commit a submission applies to
///
/// With `target`, the pending commit whose hash starts with it. Without, the
/// branch's only pending commit.
pub fn select_commit<'a>(pending: &'a [Commit], target: Option<&str>) -> Result<&'a Commit> {
    let Some(target) = target else {
        return match pending {
            [] => Err(Error::NoPendingCommit),
            [only] => Ok(only),
            many => Err(Error::MultiplePendingCommits(many.len())),
        };
    };

    let target = target.trim().to_ascii_lowercase();
    if target.is_empty() {
        return Err(Error::CommitNotFound(target));
    }

    let mut matches = pending.iter().filter(|c| c.hash.starts_with(&target));
    match (matches.next(), matches.next()) {
        (Some(commit), None) => Ok(commit),
        (Some(_), Some(_)) => Err(Error::AmbiguousCommit(target)),
        (None, _) => Err(Error::CommitNotFound(target)),
    }
}
