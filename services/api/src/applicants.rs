use crate::infra::sample_applicants;
use clap::{Args, Subcommand};
use job_board::config::AppConfig;
use job_board::error::AppError;
use job_board::gateways::{http_client, MemoryApplicantRepository, SupabaseClient};
use job_board::workflows::applications::{
    ApplicantDirectory, ApplicantRecord, ApplicantRepository,
};
use job_board::workflows::jobs::JobId;
use std::fmt::Write as _;

#[derive(Args, Debug)]
pub(crate) struct ApplicantsArgs {
    /// Read bundled sample applicants instead of Supabase
    #[arg(long)]
    pub(crate) in_memory: bool,
    #[command(subcommand)]
    pub(crate) command: ApplicantsCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ApplicantsCommand {
    /// List applicants for one posting, most recent first
    List {
        /// Posting identifier
        job_id: String,
    },
}

pub(crate) async fn run_applicants(args: ApplicantsArgs) -> Result<(), AppError> {
    let ApplicantsArgs { in_memory, command } = args;

    if in_memory {
        let directory = MemoryApplicantRepository::default();
        for record in sample_applicants() {
            directory.insert(record).await?;
        }
        return execute(&directory, command).await;
    }

    // Applicant rows are only readable with the service-role key.
    let config = AppConfig::load()?;
    let supabase = config.require_supabase()?;
    let directory = SupabaseClient::service_role(
        http_client()?,
        &supabase.url,
        supabase.service_role_key.clone(),
    );
    execute(&directory, command).await
}

async fn execute<D: ApplicantDirectory>(
    directory: &D,
    command: ApplicantsCommand,
) -> Result<(), AppError> {
    let output = match command {
        ApplicantsCommand::List { job_id } => {
            let job_id = JobId(job_id);
            let applicants = directory.applicants_for_job(&job_id).await?;
            render_applicant_list(&job_id, &applicants)
        }
    };
    print!("{output}");
    Ok(())
}

pub(crate) fn render_applicant_list(job_id: &JobId, applicants: &[ApplicantRecord]) -> String {
    if applicants.is_empty() {
        return format!("No applicants for {job_id}\n");
    }

    let mut out = String::new();
    let _ = writeln!(out, "Applicants for {job_id} ({})", applicants.len());
    for applicant in applicants {
        let applied = applicant
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let _ = writeln!(
            out,
            "- {} <{}> | applied {} | {}",
            applicant.name, applicant.email, applied, applicant.resume_url
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_directory() -> MemoryApplicantRepository {
        let directory = MemoryApplicantRepository::default();
        for record in sample_applicants() {
            directory.insert(record).await.expect("sample inserts");
        }
        directory
    }

    #[tokio::test]
    async fn listing_is_scoped_to_job_and_newest_first() {
        let directory = seeded_directory().await;
        let job_id = JobId::from("job-123");

        let applicants = directory
            .applicants_for_job(&job_id)
            .await
            .expect("listing succeeds");
        let rendered = render_applicant_list(&job_id, &applicants);

        assert!(rendered.starts_with("Applicants for job-123 (2)"));
        assert!(!rendered.contains("Katherine Johnson"));
        let grace = rendered.find("Grace Hopper").expect("grace listed");
        let ada = rendered.find("Ada Lovelace").expect("ada listed");
        assert!(grace < ada, "most recent applicant first");
        assert!(rendered.contains("applied 2025-10-03 14:05 UTC"));
    }

    #[tokio::test]
    async fn unknown_job_has_placeholder() {
        let directory = seeded_directory().await;
        let job_id = JobId::from("job-404");

        let applicants = directory
            .applicants_for_job(&job_id)
            .await
            .expect("listing succeeds");

        assert_eq!(
            render_applicant_list(&job_id, &applicants),
            "No applicants for job-404\n"
        );
    }

    #[tokio::test]
    async fn in_memory_listing_runs_without_configuration() {
        let args = ApplicantsArgs {
            in_memory: true,
            command: ApplicantsCommand::List {
                job_id: "job-207".to_string(),
            },
        };

        run_applicants(args).await.expect("in-memory listing runs");
    }
}
