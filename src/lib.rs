//! git-land - submit approved Gerrit changes from a local git branch
//!
//! The library drives one submission end to end: workspace checks, approval
//! gating, conditional upload, the submit request, waiting for the merge and
//! syncing the local branch afterwards.

pub mod auth;
pub mod error;
pub mod repo;
pub mod review;
pub mod submit;
pub mod types;
