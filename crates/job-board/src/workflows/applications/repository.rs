use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::ApplicantId;
use super::storage::BlobAddress;
use crate::workflows::jobs::JobId;

/// Row of the `applicants` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub applicant_id: ApplicantId,
    pub job_id: JobId,
    pub name: String,
    pub email: String,
    pub resume_url: BlobAddress,
    /// Assigned by the store on insert.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Append-only applicant storage. Implementations write with service
/// privileges; callers are not subject to per-user authorization.
#[async_trait]
pub trait ApplicantRepository: Send + Sync {
    async fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, PersistenceError>;
}

/// Recruiter-side reads of the applicants table. Like inserts, these need
/// service privileges since applicant rows are not publicly readable.
#[async_trait]
pub trait ApplicantDirectory: Send + Sync {
    /// Applicants for one posting, most recent first.
    async fn applicants_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<ApplicantRecord>, PersistenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("applicant insert rejected with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("applicant store unavailable: {0}")]
    Unavailable(String),
    #[error("applicant store returned an unreadable payload: {0}")]
    Decode(String),
}
