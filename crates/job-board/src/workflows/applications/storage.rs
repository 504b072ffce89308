use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantId, ResumeDocument};
use super::validation::resume_extension;

/// Object name of a stored resume: `{applicant_id}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResumeKey(String);

impl ResumeKey {
    pub fn for_resume(applicant_id: ApplicantId, resume: &ResumeDocument) -> Self {
        Self(format!("{applicant_id}.{}", resume_extension(resume)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResumeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Publicly resolvable location of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobAddress(pub String);

impl fmt::Display for BlobAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Flat-namespace object store receiving resumes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `bytes` under `key` in a single attempt and returns the
    /// address derived from the store's naming convention.
    async fn put(
        &self,
        key: &ResumeKey,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<BlobAddress, UploadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("blob store rejected upload with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}
