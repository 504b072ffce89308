use super::domain::{
    ApplicationForm, ApplicationSubmission, ResumeDocument, ResumeFormat, ResumeUpload,
};
use super::form::{EMAIL_FIELD, JOB_ID_FIELD, NAME_FIELD, RESUME_FIELD};
use crate::workflows::jobs::JobId;

/// Client-side submission faults. All map to `400 Bad Request` except
/// `UploadTooLarge`, which maps to `413 Payload Too Large`.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),
    #[error("Only PDF and DOCX files are allowed")]
    UnsupportedResumeType { content_type: Option<String> },
    #[error("Malformed form submission")]
    MalformedForm(String),
    #[error("Submission exceeds the upload size limit")]
    UploadTooLarge,
}

/// Checks presence of every field and the resume content type.
///
/// Email and job id are only checked for presence; the posting is not
/// looked up at intake time.
pub fn validate(form: ApplicationForm) -> Result<ApplicationSubmission, ValidationError> {
    let ApplicationForm {
        name,
        email,
        resume,
        job_id,
    } = form;

    let name = present(name);
    let email = present(email);
    let job_id = present(job_id);
    let resume = resume.filter(|upload| !upload.is_blank());

    let mut missing = Vec::new();
    if name.is_none() {
        missing.push(NAME_FIELD);
    }
    if email.is_none() {
        missing.push(EMAIL_FIELD);
    }
    if resume.is_none() {
        missing.push(RESUME_FIELD);
    }
    if job_id.is_none() {
        missing.push(JOB_ID_FIELD);
    }

    match (name, email, resume, job_id) {
        (Some(name), Some(email), Some(resume), Some(job_id)) => Ok(ApplicationSubmission {
            name,
            email,
            resume: accept_resume(resume)?,
            job_id: JobId(job_id),
        }),
        _ => Err(ValidationError::MissingFields(missing)),
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn accept_resume(upload: ResumeUpload) -> Result<ResumeDocument, ValidationError> {
    let ResumeUpload {
        file_name,
        content_type,
        bytes,
    } = upload;

    let format = content_type
        .as_deref()
        .and_then(ResumeFormat::from_content_type);

    match (format, content_type) {
        (Some(format), Some(content_type)) => Ok(ResumeDocument {
            file_name,
            content_type,
            format,
            bytes,
        }),
        (_, content_type) => Err(ValidationError::UnsupportedResumeType { content_type }),
    }
}

/// Extension used for the storage key.
///
/// Taken verbatim from the suffix after the last `.` of the original file
/// name. A suffix that is empty or holds anything other than ASCII letters
/// and digits falls back to the validated format, so storage keys never
/// need escaping in object URLs.
pub fn resume_extension(resume: &ResumeDocument) -> String {
    match resume.file_name.rsplit_once('.') {
        Some((_, suffix)) if is_usable_extension(suffix) => suffix.to_string(),
        _ => resume.format.extension().to_string(),
    }
}

fn is_usable_extension(suffix: &str) -> bool {
    !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric())
}
