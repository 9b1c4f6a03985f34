//! Shared test helpers

pub mod fixtures;
pub mod mock_repo;
pub mod mock_review;
