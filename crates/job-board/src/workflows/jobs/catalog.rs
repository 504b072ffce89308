use async_trait::async_trait;

use super::domain::{JobId, JobPosting};

/// Query interface over published postings.
///
/// Implementations only ever return postings whose status is active.
#[async_trait]
pub trait JobCatalog: Send + Sync {
    /// Active postings, most recently posted first.
    async fn active_jobs(&self) -> Result<Vec<JobPosting>, CatalogError>;

    /// A single active posting. Inactive or unknown ids yield `NotFound`.
    async fn active_job(&self, id: &JobId) -> Result<JobPosting, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("job posting not found")]
    NotFound,
    #[error("job catalog unavailable: {0}")]
    Unavailable(String),
    #[error("job catalog returned an unreadable payload: {0}")]
    Decode(String),
}
