//! Application intake: validate a multipart submission, store the resume, record the applicant.

pub mod domain;
pub mod form;
pub mod repository;
pub mod router;
pub mod service;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantId, ApplicationForm, ApplicationSubmission, ResumeDocument, ResumeFormat,
    ResumeUpload,
};
pub use form::{guess_content_type, read_application_form};
pub use repository::{ApplicantDirectory, ApplicantRecord, ApplicantRepository, PersistenceError};
pub use router::{application_router, bounded_application_router};
pub use service::{ApplicationIntakeService, IntakeError};
pub use storage::{BlobAddress, BlobStore, ResumeKey, UploadError};
pub use validation::{validate, ValidationError};
