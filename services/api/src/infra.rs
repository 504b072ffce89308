use chrono::{NaiveDate, TimeZone, Utc};
use job_board::workflows::applications::{ApplicantId, ApplicantRecord, BlobAddress};
use job_board::workflows::jobs::{JobId, JobPosting, JobStatus};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Resolves on Ctrl-C or SIGTERM and flips readiness off so load balancers drain first.
pub(crate) async fn shutdown_signal(readiness: Arc<AtomicBool>) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    readiness.store(false, Ordering::Release);
    info!("shutdown signal received, draining connections");
}

/// Postings served by in-memory mode and the demo.
pub(crate) fn sample_postings() -> Vec<JobPosting> {
    vec![
        JobPosting {
            id: JobId::from("job-123"),
            title: "Senior Platform Engineer".to_string(),
            department: "Engineering".to_string(),
            location: "Remote (US)".to_string(),
            employment_type: "Full-time".to_string(),
            salary_range: Some("$160k - $190k".to_string()),
            description: "Own the build, deploy, and observability stack for our hiring products."
                .to_string(),
            responsibilities: vec![
                "Run the service platform and its on-call rotation".to_string(),
                "Partner with product teams on reliability targets".to_string(),
            ],
            requirements: vec![
                "Production experience with Rust or Go".to_string(),
                "Comfort operating Postgres at scale".to_string(),
            ],
            posted_date: sample_date(2025, 9, 15),
            status: JobStatus::Active,
        },
        JobPosting {
            id: JobId::from("job-207"),
            title: "Recruiting Coordinator".to_string(),
            department: "People".to_string(),
            location: "Austin, TX".to_string(),
            employment_type: "Contract".to_string(),
            salary_range: None,
            description: "Coordinate interview loops and keep candidates informed.".to_string(),
            responsibilities: vec!["Schedule interview panels".to_string()],
            requirements: vec!["Two years of recruiting operations".to_string()],
            posted_date: sample_date(2025, 10, 2),
            status: JobStatus::Active,
        },
        JobPosting {
            id: JobId::from("job-099"),
            title: "Office Manager".to_string(),
            department: "Operations".to_string(),
            location: "Austin, TX".to_string(),
            employment_type: "Full-time".to_string(),
            salary_range: None,
            description: "Filled position kept for history.".to_string(),
            responsibilities: Vec::new(),
            requirements: Vec::new(),
            posted_date: sample_date(2025, 6, 1),
            status: JobStatus::Inactive,
        },
    ]
}

fn sample_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Applicants served by `applicants list --in-memory`.
pub(crate) fn sample_applicants() -> Vec<ApplicantRecord> {
    [
        ("job-123", "Ada Lovelace", "ada@example.com", (2025, 10, 3, 14, 5)),
        ("job-123", "Grace Hopper", "grace@example.com", (2025, 10, 6, 9, 30)),
        ("job-207", "Katherine Johnson", "katherine@example.com", (2025, 10, 4, 16, 45)),
    ]
    .into_iter()
    .map(|(job_id, name, email, (year, month, day, hour, minute))| {
        let applicant_id = ApplicantId::generate();
        ApplicantRecord {
            applicant_id,
            job_id: JobId::from(job_id),
            name: name.to_string(),
            email: email.to_string(),
            resume_url: BlobAddress(format!("memory://resumes/{applicant_id}.pdf")),
            created_at: Utc
                .with_ymd_and_hms(year, month, day, hour, minute, 0)
                .single(),
        }
    })
    .collect()
}
