use crate::applicants::{run_applicants, ApplicantsArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::jobs::{run_jobs, JobsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use job_board::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Job Board",
    about = "Serve the job board intake API and inspect postings and applicants",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Query active job postings
    Jobs(JobsArgs),
    /// Review applicants for a posting
    Applicants(ApplicantsArgs),
    /// Submit a sample application against in-memory stores
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Use process-local stores instead of Supabase and Cloud Storage
    #[arg(long)]
    pub(crate) in_memory: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Jobs(args) => run_jobs(args).await,
        Command::Applicants(args) => run_applicants(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
