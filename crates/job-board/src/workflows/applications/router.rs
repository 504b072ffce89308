use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::info;

use super::form::read_application_form;
use super::repository::ApplicantRepository;
use super::service::{ApplicationIntakeService, IntakeError};
use super::storage::BlobStore;
use super::validation::ValidationError;

pub const SUBMIT_APPLICATION_PATH: &str = "/api/submit-application";
pub const APPLICATIONS_PATH: &str = "/api/v1/applications";

const SUCCESS_MESSAGE: &str = "Application submitted successfully";
const SERVER_ERROR_MESSAGE: &str = "Failed to process application";

/// Router builder exposing the application intake endpoint.
///
/// Request bodies are unbounded; resumes of any size are accepted.
pub fn application_router<B, R>(service: Arc<ApplicationIntakeService<B, R>>) -> Router
where
    B: BlobStore + 'static,
    R: ApplicantRepository + 'static,
{
    bounded_application_router(service, None)
}

/// Same routes as [`application_router`], rejecting bodies larger than
/// `max_upload_bytes` with `413 Payload Too Large` when a cap is given.
pub fn bounded_application_router<B, R>(
    service: Arc<ApplicationIntakeService<B, R>>,
    max_upload_bytes: Option<usize>,
) -> Router
where
    B: BlobStore + 'static,
    R: ApplicantRepository + 'static,
{
    let body_limit = match max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route(SUBMIT_APPLICATION_PATH, post(submit_handler::<B, R>))
        .route(APPLICATIONS_PATH, post(submit_handler::<B, R>))
        .layer(body_limit)
        .with_state(service)
}

pub(crate) async fn submit_handler<B, R>(
    State(service): State<Arc<ApplicationIntakeService<B, R>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response
where
    B: BlobStore + 'static,
    R: ApplicantRepository + 'static,
{
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            info!(reason = %rejection.body_text(), "rejected non-multipart submission");
            return bad_request("Malformed form submission");
        }
    };

    let form = match read_application_form(multipart).await {
        Ok(form) => form,
        Err(error @ ValidationError::UploadTooLarge) => {
            info!("rejected submission over the upload limit");
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, &error.to_string());
        }
        Err(error) => {
            info!(error = ?error, "rejected unreadable submission");
            return bad_request(&error.to_string());
        }
    };

    match service.submit(form).await {
        Ok(applicant_id) => {
            let payload = json!({
                "success": true,
                "applicantId": applicant_id,
                "message": SUCCESS_MESSAGE,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(IntakeError::Validation(error)) => {
            info!(error = ?error, "rejected invalid submission");
            bad_request(&error.to_string())
        }
        Err(IntakeError::Upload(_) | IntakeError::Persistence(_)) => {
            let payload = json!({
                "error": SERVER_ERROR_MESSAGE,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn bad_request(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, message)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}
