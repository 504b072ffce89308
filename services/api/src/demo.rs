use crate::infra::sample_postings;
use bytes::Bytes;
use clap::Args;
use job_board::error::AppError;
use job_board::gateways::{MemoryApplicantRepository, MemoryBlobStore, MemoryJobCatalog};
use job_board::workflows::applications::{
    guess_content_type, ApplicationForm, ApplicationIntakeService, IntakeError, ResumeUpload,
};
use job_board::workflows::jobs::{JobCatalog, JobId};
use std::path::PathBuf;
use std::sync::Arc;

const SAMPLE_RESUME: &[u8] = b"%PDF-1.4\n% sample resume\n1 0 obj << /Type /Catalog >> endobj\n%%EOF\n";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Applicant name
    #[arg(long, default_value = "Ada Lovelace")]
    pub(crate) name: String,
    /// Applicant email
    #[arg(long, default_value = "ada@example.com")]
    pub(crate) email: String,
    /// Posting to apply for
    #[arg(long, default_value = "job-123")]
    pub(crate) job_id: String,
    /// Resume file to upload (defaults to a bundled one-page PDF)
    #[arg(long)]
    pub(crate) resume: Option<PathBuf>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        name,
        email,
        job_id,
        resume,
    } = args;

    let catalog = MemoryJobCatalog::new(sample_postings());
    let blobs = MemoryBlobStore::default();
    let applicants = MemoryApplicantRepository::default();
    let service =
        ApplicationIntakeService::new(Arc::new(blobs.clone()), Arc::new(applicants.clone()));

    println!("Job board intake demo");
    match catalog.active_job(&JobId(job_id.clone())).await {
        Ok(job) => println!("Applying to: {} ({})", job.title, job.id),
        Err(_) => println!("Applying to: {job_id} (not an active sample posting; intake does not check)"),
    }

    let upload = load_resume(resume).await?;
    let form = ApplicationForm {
        name: Some(name),
        email: Some(email),
        resume: Some(upload),
        job_id: Some(job_id.clone()),
    };

    match service.submit(form).await {
        Ok(applicant_id) => println!("\nAccepted: applicant {applicant_id}"),
        Err(err) => println!("\nRejected: {}", describe(&err)),
    }

    let rejected = ApplicationForm {
        name: Some("Charles Babbage".to_string()),
        email: Some("charles@example.com".to_string()),
        resume: Some(ResumeUpload {
            file_name: "portrait.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(b"\x89PNG\r\n"),
        }),
        job_id: Some(job_id),
    };
    if let Err(err) = service.submit(rejected).await {
        println!("Rejected second submission: {}", describe(&err));
    }

    println!("\nBlob store");
    for (key, blob) in blobs.objects() {
        println!(
            "- {key} ({}, {} bytes) -> {}",
            blob.content_type,
            blob.bytes.len(),
            blob.address
        );
    }

    println!("\nApplicant table");
    for record in applicants.records() {
        println!(
            "- {} | job {} | {} <{}> | {}",
            record.applicant_id, record.job_id, record.name, record.email, record.resume_url
        );
    }

    Ok(())
}

async fn load_resume(path: Option<PathBuf>) -> Result<ResumeUpload, AppError> {
    let Some(path) = path else {
        return Ok(ResumeUpload {
            file_name: "resume.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(SAMPLE_RESUME),
        });
    };

    let bytes = tokio::fs::read(&path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = guess_content_type(&file_name);

    Ok(ResumeUpload {
        file_name,
        content_type,
        bytes: Bytes::from(bytes),
    })
}

fn describe(err: &IntakeError) -> String {
    match err {
        IntakeError::Validation(inner) => format!("400 {inner}"),
        IntakeError::Upload(_) | IntakeError::Persistence(_) => {
            "500 Failed to process application".to_string()
        }
    }
}
