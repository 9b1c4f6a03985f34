//! Mock review service for testing
//!
//! These are test utilities - not every test binary uses all of them.

#![allow(dead_code)]

use async_trait::async_trait;
use git_land::error::{Error, Result};
use git_land::review::ReviewService;
use git_land::types::{Change, ChangeKey, ChangeOption, GerritConfig};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Call record for `submit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitCall {
    pub key: String,
    pub wait_for_merge: bool,
}

/// Scripted review service
///
/// `get_change` answers from a queue of changes: each call takes the next
/// one, and the last one keeps being returned once the queue is down to it.
///
/// Features:
/// - Call tracking for verification
/// - Error injection on a specific `get_change` call and on `submit`
pub struct MockReviewService {
    config: GerritConfig,
    changes: Mutex<VecDeque<Change>>,
    // Call tracking
    get_change_calls: Mutex<Vec<String>>,
    submit_calls: Mutex<Vec<SubmitCall>>,
    // Error injection
    error_on_get_change_call: Mutex<Option<(usize, String)>>,
    error_on_submit: Mutex<Option<String>>,
}

impl MockReviewService {
    /// Create a mock answering with `changes` in order
    pub fn with_changes(config: GerritConfig, changes: Vec<Change>) -> Self {
        Self {
            config,
            changes: Mutex::new(changes.into()),
            get_change_calls: Mutex::new(Vec::new()),
            submit_calls: Mutex::new(Vec::new()),
            error_on_get_change_call: Mutex::new(None),
            error_on_submit: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make the `call`-th `get_change` (1-based) return an error
    pub fn fail_get_change_on_call(&self, call: usize, msg: &str) {
        *self.error_on_get_change_call.lock().unwrap() = Some((call, msg.to_string()));
    }

    /// Make `submit` return an error
    pub fn fail_submit(&self, err: &str) {
        *self.error_on_submit.lock().unwrap() = Some(err.to_string());
    }

    // === Call verification methods ===

    /// Keys `get_change` was called with, in order
    pub fn get_change_calls(&self) -> Vec<String> {
        self.get_change_calls.lock().unwrap().clone()
    }

    /// Number of `get_change` calls
    pub fn get_change_count(&self) -> usize {
        self.get_change_calls.lock().unwrap().len()
    }

    /// All `submit` calls
    pub fn submit_calls(&self) -> Vec<SubmitCall> {
        self.submit_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewService for MockReviewService {
    async fn get_change(&self, key: &ChangeKey, _options: &[ChangeOption]) -> Result<Change> {
        let call = {
            let mut calls = self.get_change_calls.lock().unwrap();
            calls.push(key.to_string());
            calls.len()
        };

        if let Some((n, msg)) = self.error_on_get_change_call.lock().unwrap().as_ref() {
            if *n == call {
                return Err(Error::Gerrit(msg.clone()));
            }
        }

        let mut changes = self.changes.lock().unwrap();
        let change = if changes.len() > 1 {
            changes.pop_front()
        } else {
            changes.front().cloned()
        };
        change.ok_or_else(|| Error::ChangeNotFound(key.to_string()))
    }

    async fn submit(&self, key: &ChangeKey, wait_for_merge: bool) -> Result<()> {
        self.submit_calls.lock().unwrap().push(SubmitCall {
            key: key.to_string(),
            wait_for_merge,
        });

        if let Some(msg) = self.error_on_submit.lock().unwrap().as_ref() {
            return Err(Error::SubmitRejected(msg.clone()));
        }
        Ok(())
    }

    fn config(&self) -> &GerritConfig {
        &self.config
    }
}
