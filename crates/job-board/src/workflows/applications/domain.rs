use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflows::jobs::JobId;

/// Opaque applicant token. Doubles as the resume storage key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantId(pub Uuid);

impl ApplicantId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Raw multipart fields as received. Every field may be missing.
#[derive(Debug, Clone, Default)]
pub struct ApplicationForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub resume: Option<ResumeUpload>,
    pub job_id: Option<String>,
}

/// File part of the form before its content type has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ResumeUpload {
    /// Browsers send an empty, unnamed file part when nothing was selected.
    pub fn is_blank(&self) -> bool {
        self.file_name.trim().is_empty() && self.bytes.is_empty()
    }
}

/// Accepted resume formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeFormat {
    Pdf,
    Doc,
    Docx,
}

const PDF_MIME: &str = "application/pdf";
const DOC_MIME: &str = "application/msword";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

impl ResumeFormat {
    pub const ALL: [ResumeFormat; 3] = [ResumeFormat::Pdf, ResumeFormat::Doc, ResumeFormat::Docx];

    /// Matches a content-type tag, ignoring case and parameters.
    pub fn from_content_type(raw: &str) -> Option<Self> {
        let parsed: mime::Mime = raw.trim().parse().ok()?;
        let essence = parsed.essence_str().to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|format| format.content_type() == essence)
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => PDF_MIME,
            ResumeFormat::Doc => DOC_MIME,
            ResumeFormat::Docx => DOCX_MIME,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "pdf",
            ResumeFormat::Doc => "doc",
            ResumeFormat::Docx => "docx",
        }
    }
}

/// Resume that passed the content-type allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDocument {
    pub file_name: String,
    pub content_type: String,
    pub format: ResumeFormat,
    pub bytes: Bytes,
}

/// A complete, validated submission ready for upload and persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationSubmission {
    pub name: String,
    pub email: String,
    pub resume: ResumeDocument,
    pub job_id: JobId,
}
