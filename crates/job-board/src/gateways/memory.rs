//! Process-local stores for development mode, the CLI demo, and tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::workflows::applications::{
    ApplicantDirectory, ApplicantId, ApplicantRecord, ApplicantRepository, BlobAddress, BlobStore,
    PersistenceError, ResumeKey, UploadError,
};
use crate::workflows::jobs::{CatalogError, JobCatalog, JobId, JobPosting};

const MEMORY_BASE_URL: &str = "memory://resumes";

/// Object kept by [`MemoryBlobStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Bytes,
    pub content_type: String,
    pub address: BlobAddress,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    objects: Arc<Mutex<BTreeMap<String, StoredBlob>>>,
}

impl MemoryBlobStore {
    pub fn address_for(key: &ResumeKey) -> BlobAddress {
        BlobAddress(format!("{MEMORY_BASE_URL}/{key}"))
    }

    pub fn objects(&self) -> BTreeMap<String, StoredBlob> {
        self.objects
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        key: &ResumeKey,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<BlobAddress, UploadError> {
        let mut guard = self
            .objects
            .lock()
            .map_err(|_| UploadError::Unavailable("blob store lock poisoned".to_string()))?;

        let address = Self::address_for(key);
        guard.insert(
            key.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
                address: address.clone(),
            },
        );
        Ok(address)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryApplicantRepository {
    rows: Arc<Mutex<BTreeMap<ApplicantId, ApplicantRecord>>>,
}

impl MemoryApplicantRepository {
    pub fn records(&self) -> Vec<ApplicantRecord> {
        self.rows
            .lock()
            .map(|guard| guard.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ApplicantRepository for MemoryApplicantRepository {
    async fn insert(&self, mut record: ApplicantRecord) -> Result<ApplicantRecord, PersistenceError> {
        let mut guard = self
            .rows
            .lock()
            .map_err(|_| PersistenceError::Unavailable("applicant table lock poisoned".to_string()))?;

        if guard.contains_key(&record.applicant_id) {
            return Err(PersistenceError::Rejected {
                status: 409,
                detail: format!("duplicate applicant_id {}", record.applicant_id),
            });
        }

        record.created_at.get_or_insert_with(chrono::Utc::now);
        guard.insert(record.applicant_id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl ApplicantDirectory for MemoryApplicantRepository {
    async fn applicants_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<ApplicantRecord>, PersistenceError> {
        let mut applicants: Vec<ApplicantRecord> = self
            .records()
            .into_iter()
            .filter(|record| &record.job_id == job_id)
            .collect();
        applicants.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applicants)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryJobCatalog {
    postings: Arc<Vec<JobPosting>>,
}

impl MemoryJobCatalog {
    pub fn new(postings: Vec<JobPosting>) -> Self {
        Self {
            postings: Arc::new(postings),
        }
    }
}

#[async_trait]
impl JobCatalog for MemoryJobCatalog {
    async fn active_jobs(&self) -> Result<Vec<JobPosting>, CatalogError> {
        let mut active: Vec<JobPosting> = self
            .postings
            .iter()
            .filter(|posting| posting.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| b.posted_date.cmp(&a.posted_date));
        Ok(active)
    }

    async fn active_job(&self, id: &JobId) -> Result<JobPosting, CatalogError> {
        self.postings
            .iter()
            .find(|posting| &posting.id == id && posting.is_active())
            .cloned()
            .ok_or(CatalogError::NotFound)
    }
}
