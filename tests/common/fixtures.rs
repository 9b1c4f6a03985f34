//! Test data factories for git-land types
//!
//! These are test utilities - not every test binary uses all of them.

#![allow(dead_code)]

use git_land::types::{Branch, Change, ChangeStatus, Commit, GerritConfig, Label};
use std::collections::BTreeMap;

/// Hash of the commit most tests submit
pub const LOCAL_HASH: &str = "1111111111111111111111111111111111111111";

/// Revision Gerrit reports after merging (a cherry-pick of the local commit)
pub const MERGED_HASH: &str = "9999999999999999999999999999999999999999";

/// Change-Id of the commit most tests submit
pub const CHANGE_ID: &str = "I0123456789abcdef0123456789abcdef01234567";

/// Create a commit with a Change-Id trailer
pub fn make_commit(hash: &str, change_id: &str) -> Commit {
    Commit {
        hash: hash.to_string(),
        subject: format!("pkg: commit {}", &hash[..4]),
        change_id: Some(change_id.to_string()),
    }
}

/// The commit most tests submit
pub fn default_commit() -> Commit {
    make_commit(LOCAL_HASH, CHANGE_ID)
}

/// A branch tracking origin/master
pub fn make_branch(name: &str) -> Branch {
    Branch {
        name: name.to_string(),
        remote: "origin".to_string(),
        upstream: "origin/master".to_string(),
    }
}

/// Gerrit configuration used by the mock service
pub fn gerrit_config() -> GerritConfig {
    GerritConfig {
        url: "https://gerrit.example.com".to_string(),
        project: "demo".to_string(),
    }
}

/// A required label with an approval
pub fn approved() -> Label {
    Label {
        optional: false,
        approved: Some("Reviewer".to_string()),
        rejected: None,
    }
}

/// A required label with no votes
pub fn unapproved() -> Label {
    Label::default()
}

/// A required label carrying a rejection
pub fn rejected() -> Label {
    Label {
        optional: false,
        approved: None,
        rejected: Some("Reviewer".to_string()),
    }
}

/// A change with Code-Review and Verified approved
pub fn make_change(status: ChangeStatus, revision: &str, mergeable: bool) -> Change {
    make_change_with_labels(
        status,
        revision,
        mergeable,
        &[("Code-Review", approved()), ("Verified", approved())],
    )
}

/// A change with explicit labels
pub fn make_change_with_labels(
    status: ChangeStatus,
    revision: &str,
    mergeable: bool,
    labels: &[(&str, Label)],
) -> Change {
    Change {
        number: 4242,
        project: "demo".to_string(),
        branch: "master".to_string(),
        change_id: CHANGE_ID.to_string(),
        subject: "pkg: commit 1111".to_string(),
        status,
        current_revision: Some(revision.to_string()),
        mergeable,
        labels: labels
            .iter()
            .map(|(name, label)| ((*name).to_string(), label.clone()))
            .collect::<BTreeMap<_, _>>(),
        updated: None,
    }
}

/// A merged change at [`MERGED_HASH`]
pub fn merged_change() -> Change {
    make_change(ChangeStatus::Merged, MERGED_HASH, false)
}
