//! Review service factory
//!
//! Creates the Gerrit service for a configured server.

use crate::auth::get_gerrit_auth;
use crate::error::Result;
use crate::review::{GerritService, ReviewService};
use crate::types::GerritConfig;

/// Create a review service from configuration
///
/// Resolves credentials for the server host and builds the HTTP client.
pub async fn create_review_service(config: &GerritConfig) -> Result<Box<dyn ReviewService>> {
    let host = config.host().unwrap_or_default();
    let auth = get_gerrit_auth(&host).await?;
    Ok(Box::new(GerritService::new(config.clone(), Some(auth.credentials))))
}
