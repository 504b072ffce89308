use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use tracing::debug;

use super::domain::{ApplicationForm, ResumeUpload};
use super::validation::ValidationError;

pub const NAME_FIELD: &str = "name";
pub const EMAIL_FIELD: &str = "email";
pub const RESUME_FIELD: &str = "resume";
pub const JOB_ID_FIELD: &str = "jobId";

/// Drains a multipart body into an [`ApplicationForm`].
///
/// The first occurrence of each field wins and unknown fields are skipped.
/// A `resume` part sent as plain text (no filename) is treated as absent.
pub async fn read_application_form(
    mut multipart: Multipart,
) -> Result<ApplicationForm, ValidationError> {
    let mut form = ApplicationForm::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            NAME_FIELD | EMAIL_FIELD | JOB_ID_FIELD => {
                let value = field.text().await.map_err(malformed)?;
                let slot = match name.as_str() {
                    NAME_FIELD => &mut form.name,
                    EMAIL_FIELD => &mut form.email,
                    _ => &mut form.job_id,
                };
                if slot.is_none() {
                    *slot = Some(value);
                }
            }
            RESUME_FIELD => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;

                if form.resume.is_some() {
                    continue;
                }
                if let Some(file_name) = file_name {
                    let content_type = content_type.or_else(|| guess_content_type(&file_name));
                    form.resume = Some(ResumeUpload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            other => debug!(field = other, "ignoring unexpected form field"),
        }
    }

    Ok(form)
}

/// Fallback for clients that omit the part's content type.
pub fn guess_content_type(file_name: &str) -> Option<String> {
    mime_guess::from_path(file_name)
        .first()
        .map(|guessed| guessed.essence_str().to_string())
}

fn malformed(err: MultipartError) -> ValidationError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ValidationError::UploadTooLarge;
    }
    ValidationError::MalformedForm(err.body_text())
}
