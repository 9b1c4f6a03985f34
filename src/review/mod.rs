//! Review service access
//!
//! Provides the interface the submission engine uses to talk to Gerrit.

mod detection;
mod factory;
mod gerrit;

pub use detection::{detect_gerrit_host, parse_gerrit_config};
pub use factory::create_review_service;
pub use gerrit::GerritService;

use crate::error::Result;
use crate::types::{Change, ChangeKey, ChangeOption, GerritConfig};
use async_trait::async_trait;

/// Review service trait for change operations
///
/// The orchestrator only depends on this trait, so the whole pipeline can run
/// against an in-memory fake.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Fetch the current state of a change
    async fn get_change(&self, key: &ChangeKey, options: &[ChangeOption]) -> Result<Change>;

    /// Request submission of a change
    ///
    /// With `wait_for_merge` the server holds the response until its first
    /// merge attempt has finished.
    async fn submit(&self, key: &ChangeKey, wait_for_merge: bool) -> Result<()>;

    /// Get the server configuration
    fn config(&self) -> &GerritConfig;
}
