use super::common::*;
use bytes::Bytes;

use crate::workflows::applications::domain::{ResumeDocument, ResumeFormat, ResumeUpload};
use crate::workflows::applications::storage::ResumeKey;
use crate::workflows::applications::validation::{resume_extension, validate, ValidationError};
use crate::workflows::applications::ApplicantId;
use crate::workflows::jobs::JobId;

fn document(file_name: &str, format: ResumeFormat) -> ResumeDocument {
    ResumeDocument {
        file_name: file_name.to_string(),
        content_type: format.content_type().to_string(),
        format,
        bytes: Bytes::from_static(PDF_BYTES),
    }
}

#[test]
fn complete_form_produces_submission() {
    let submission = validate(form()).expect("form is valid");

    assert_eq!(submission.name, "Ada Lovelace");
    assert_eq!(submission.email, "ada@example.com");
    assert_eq!(submission.job_id, JobId::from("job-123"));
    assert_eq!(submission.resume.format, ResumeFormat::Pdf);
    assert_eq!(submission.resume.content_type, "application/pdf");
}

#[test]
fn each_missing_field_is_reported() {
    let cases: [(&str, fn(&mut crate::workflows::applications::ApplicationForm)); 4] = [
        ("name", |form| form.name = None),
        ("email", |form| form.email = None),
        ("resume", |form| form.resume = None),
        ("jobId", |form| form.job_id = None),
    ];

    for (field, strip) in cases {
        let mut form = form();
        strip(&mut form);
        match validate(form) {
            Err(ValidationError::MissingFields(missing)) => assert_eq!(missing, vec![field]),
            other => panic!("expected {field} to be missing, got {other:?}"),
        }
    }
}

#[test]
fn blank_text_and_empty_file_parts_count_as_missing() {
    let mut form = form();
    form.name = Some("   ".to_string());
    form.resume = Some(ResumeUpload {
        file_name: String::new(),
        content_type: Some("application/octet-stream".to_string()),
        bytes: Bytes::new(),
    });

    match validate(form) {
        Err(ValidationError::MissingFields(missing)) => {
            assert_eq!(missing, vec!["name", "resume"]);
        }
        other => panic!("expected missing fields, got {other:?}"),
    }
}

#[test]
fn accepts_word_formats_and_content_type_parameters() {
    let accepted = [
        ("application/msword", ResumeFormat::Doc),
        (
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ResumeFormat::Docx,
        ),
        ("Application/PDF; charset=binary", ResumeFormat::Pdf),
    ];

    for (content_type, format) in accepted {
        let mut form = form();
        form.resume = Some(ResumeUpload {
            content_type: Some(content_type.to_string()),
            ..pdf_resume()
        });
        let submission = validate(form).expect("content type accepted");
        assert_eq!(submission.resume.format, format);
        assert_eq!(submission.resume.content_type, content_type);
    }
}

#[test]
fn rejects_resume_types_outside_allow_list() {
    for content_type in [Some("text/plain"), Some("image/png"), Some("not a mime"), None] {
        let mut form = form();
        form.resume = Some(ResumeUpload {
            content_type: content_type.map(str::to_string),
            ..pdf_resume()
        });

        match validate(form) {
            Err(error @ ValidationError::UnsupportedResumeType { .. }) => {
                assert_eq!(error.to_string(), "Only PDF and DOCX files are allowed");
            }
            other => panic!("expected unsupported type for {content_type:?}, got {other:?}"),
        }
    }
}

#[test]
fn missing_fields_take_precedence_over_file_type() {
    let mut form = form();
    form.email = None;
    form.resume = Some(ResumeUpload {
        content_type: Some("image/png".to_string()),
        ..pdf_resume()
    });

    assert!(matches!(
        validate(form),
        Err(ValidationError::MissingFields(_))
    ));
}

#[test]
fn extension_is_taken_from_last_suffix() {
    assert_eq!(
        resume_extension(&document("ada.lovelace.cv.PDF", ResumeFormat::Pdf)),
        "PDF"
    );
    assert_eq!(
        resume_extension(&document("cv.docx", ResumeFormat::Docx)),
        "docx"
    );
}

#[test]
fn extension_falls_back_to_format_when_suffix_unusable() {
    assert_eq!(resume_extension(&document("resume", ResumeFormat::Pdf)), "pdf");
    assert_eq!(resume_extension(&document("resume.", ResumeFormat::Doc)), "doc");
    assert_eq!(
        resume_extension(&document("dir.v2/resume", ResumeFormat::Docx)),
        "docx"
    );
}

#[test]
fn url_significant_suffixes_fall_back_to_format() {
    for file_name in ["resume.pdf?download=1", "resume.pdf#page=2", "resume.p%2Fdf", "cv.d ocx"] {
        assert_eq!(
            resume_extension(&document(file_name, ResumeFormat::Pdf)),
            "pdf",
            "{file_name}"
        );
    }
}

#[test]
fn resume_key_prefixes_extension_with_applicant_id() {
    let applicant_id = ApplicantId::generate();
    let key = ResumeKey::for_resume(applicant_id, &document("resume.pdf", ResumeFormat::Pdf));
    assert_eq!(key.as_str(), format!("{applicant_id}.pdf"));
}
