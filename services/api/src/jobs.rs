use crate::infra::sample_postings;
use clap::{Args, Subcommand};
use job_board::config::AppConfig;
use job_board::error::AppError;
use job_board::gateways::{http_client, MemoryJobCatalog, SupabaseClient};
use job_board::workflows::jobs::{JobCatalog, JobId, JobPosting};
use std::fmt::Write as _;

#[derive(Args, Debug)]
pub(crate) struct JobsArgs {
    /// Read the bundled sample postings instead of Supabase
    #[arg(long)]
    pub(crate) in_memory: bool,
    #[command(subcommand)]
    pub(crate) command: JobsCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum JobsCommand {
    /// List active postings, newest first
    List,
    /// Show one active posting in full
    Show {
        /// Posting identifier
        id: String,
    },
}

pub(crate) async fn run_jobs(args: JobsArgs) -> Result<(), AppError> {
    let JobsArgs { in_memory, command } = args;

    if in_memory {
        let catalog = MemoryJobCatalog::new(sample_postings());
        return execute(&catalog, command).await;
    }

    let config = AppConfig::load()?;
    let supabase = config.require_supabase()?;
    let catalog = SupabaseClient::anonymous(http_client()?, &supabase.url, supabase.anon_key.clone());
    execute(&catalog, command).await
}

async fn execute<C: JobCatalog>(catalog: &C, command: JobsCommand) -> Result<(), AppError> {
    let output = match command {
        JobsCommand::List => render_job_list(&catalog.active_jobs().await?),
        JobsCommand::Show { id } => render_job_detail(&catalog.active_job(&JobId(id)).await?),
    };
    print!("{output}");
    Ok(())
}

pub(crate) fn render_job_list(jobs: &[JobPosting]) -> String {
    if jobs.is_empty() {
        return "No open positions\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Open positions ({})", jobs.len());
    for job in jobs {
        let _ = writeln!(
            out,
            "- [{}] {} | {} | {} | {} | posted {}",
            job.id, job.title, job.department, job.location, job.employment_type, job.posted_date
        );
    }
    out
}

pub(crate) fn render_job_detail(job: &JobPosting) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", job.title, job.id);
    let _ = writeln!(out, "{} | {} | {}", job.department, job.location, job.employment_type);
    if let Some(salary) = &job.salary_range {
        let _ = writeln!(out, "Salary: {salary}");
    }
    let _ = writeln!(out, "Posted {}", job.posted_date.format("%B %-d, %Y"));
    let _ = writeln!(out, "\n{}", job.description);

    for (heading, items) in [
        ("Responsibilities", &job.responsibilities),
        ("Requirements", &job.requirements),
    ] {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{heading}");
        for item in items {
            let _ = writeln!(out, "- {item}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_listing_hides_inactive_postings() {
        let catalog = MemoryJobCatalog::new(sample_postings());
        let jobs = catalog.active_jobs().await.expect("listing succeeds");
        let rendered = render_job_list(&jobs);

        assert!(rendered.starts_with("Open positions (2)"));
        assert!(!rendered.contains("Office Manager"));
        let recruiting = rendered.find("job-207").expect("newest listed");
        let platform = rendered.find("job-123").expect("older listed");
        assert!(recruiting < platform, "newest posting first");
    }

    #[test]
    fn detail_includes_sections_and_optional_salary() {
        let postings = sample_postings();
        let rendered = render_job_detail(&postings[0]);
        assert!(rendered.contains("Salary: $160k - $190k"));
        assert!(rendered.contains("Posted September 15, 2025"));
        assert!(rendered.contains("\nResponsibilities\n- Run the service platform"));

        let rendered = render_job_detail(&postings[1]);
        assert!(!rendered.contains("Salary:"));
    }

    #[test]
    fn empty_listing_has_placeholder() {
        assert_eq!(render_job_list(&[]), "No open positions\n");
    }
}
