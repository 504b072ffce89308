use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use bytes::Bytes;
use serde_json::Value;

use crate::gateways::memory::{MemoryApplicantRepository, MemoryBlobStore};
use crate::workflows::applications::domain::{ApplicationForm, ResumeUpload};
use crate::workflows::applications::repository::{
    ApplicantRecord, ApplicantRepository, PersistenceError,
};
use crate::workflows::applications::storage::{BlobAddress, BlobStore, ResumeKey, UploadError};
use crate::workflows::applications::{application_router, ApplicationIntakeService};

pub(super) const PDF_BYTES: &[u8] = b"%PDF-1.7\n1 0 obj << /Type /Catalog >> endobj\n%%EOF";
pub(super) const BOUNDARY: &str = "job-board-test-boundary";

pub(super) fn pdf_resume() -> ResumeUpload {
    ResumeUpload {
        file_name: "resume.pdf".to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: Bytes::from_static(PDF_BYTES),
    }
}

pub(super) fn form() -> ApplicationForm {
    ApplicationForm {
        name: Some("Ada Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        resume: Some(pdf_resume()),
        job_id: Some("job-123".to_string()),
    }
}

pub(super) type MemoryService = ApplicationIntakeService<MemoryBlobStore, MemoryApplicantRepository>;

pub(super) fn build_service() -> (MemoryService, MemoryBlobStore, MemoryApplicantRepository) {
    let blobs = MemoryBlobStore::default();
    let applicants = MemoryApplicantRepository::default();
    let service = ApplicationIntakeService::new(Arc::new(blobs.clone()), Arc::new(applicants.clone()));
    (service, blobs, applicants)
}

pub(super) fn router_with_service<B, R>(service: ApplicationIntakeService<B, R>) -> axum::Router
where
    B: BlobStore + 'static,
    R: ApplicantRepository + 'static,
{
    application_router(Arc::new(service))
}

pub(super) struct OfflineBlobStore;

#[async_trait]
impl BlobStore for OfflineBlobStore {
    async fn put(
        &self,
        _key: &ResumeKey,
        _bytes: Bytes,
        _content_type: &str,
    ) -> Result<BlobAddress, UploadError> {
        Err(UploadError::Unavailable("bucket offline".to_string()))
    }
}

pub(super) struct RejectingRepository;

#[async_trait]
impl ApplicantRepository for RejectingRepository {
    async fn insert(&self, _record: ApplicantRecord) -> Result<ApplicantRecord, PersistenceError> {
        Err(PersistenceError::Rejected {
            status: 503,
            detail: "database offline".to_string(),
        })
    }
}

pub(super) enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: Option<&'a str>,
        bytes: &'a [u8],
    },
}

pub(super) fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
                    )
                    .as_bytes(),
                );
                if let Some(content_type) = content_type {
                    body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn complete_parts<'a>() -> Vec<Part<'a>> {
    vec![
        Part::Text("name", "Ada Lovelace"),
        Part::Text("email", "ada@example.com"),
        Part::File {
            name: "resume",
            file_name: "resume.pdf",
            content_type: Some("application/pdf"),
            bytes: PDF_BYTES,
        },
        Part::Text("jobId", "job-123"),
    ]
}

pub(super) fn submission_request(path: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::post(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
