use std::sync::Arc;

use tracing::{error, info, warn};

use super::domain::{ApplicantId, ApplicationForm};
use super::repository::{ApplicantRecord, ApplicantRepository, PersistenceError};
use super::storage::{BlobStore, ResumeKey, UploadError};
use super::validation::{validate, ValidationError};

/// Service composing validation, the blob store, and the applicant table.
///
/// Phases run strictly in order: validate, mint id, upload, insert. There is
/// no retry and no rollback; a failed insert leaves the uploaded resume behind.
pub struct ApplicationIntakeService<B, R> {
    blobs: Arc<B>,
    applicants: Arc<R>,
}

impl<B, R> ApplicationIntakeService<B, R>
where
    B: BlobStore + 'static,
    R: ApplicantRepository + 'static,
{
    pub fn new(blobs: Arc<B>, applicants: Arc<R>) -> Self {
        Self { blobs, applicants }
    }

    /// Accept a submission, returning the minted applicant token.
    pub async fn submit(&self, form: ApplicationForm) -> Result<ApplicantId, IntakeError> {
        let submission = validate(form)?;

        let applicant_id = ApplicantId::generate();
        let key = ResumeKey::for_resume(applicant_id, &submission.resume);

        let resume_url = self
            .blobs
            .put(
                &key,
                submission.resume.bytes.clone(),
                &submission.resume.content_type,
            )
            .await
            .map_err(|err| {
                error!(%applicant_id, storage_key = %key, error = %err, "resume upload failed");
                err
            })?;

        info!(
            %applicant_id,
            storage_key = %key,
            size = submission.resume.bytes.len(),
            "resume stored"
        );

        let record = ApplicantRecord {
            applicant_id,
            job_id: submission.job_id,
            name: submission.name,
            email: submission.email,
            resume_url,
            created_at: None,
        };
        let job_id = record.job_id.clone();
        let address = record.resume_url.clone();

        match self.applicants.insert(record).await {
            Ok(stored) => {
                info!(applicant_id = %stored.applicant_id, %job_id, "application recorded");
                Ok(stored.applicant_id)
            }
            Err(err) => {
                error!(%applicant_id, %job_id, error = %err, "applicant insert failed");
                warn!(
                    %applicant_id,
                    storage_key = %key,
                    resume_url = %address,
                    "orphaned resume left in blob store"
                );
                Err(err.into())
            }
        }
    }
}

/// Error raised by the intake service, one variant per phase.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
