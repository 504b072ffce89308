use crate::cli::ServeArgs;
use crate::infra::{shutdown_signal, AppState};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_board::config::AppConfig;
use job_board::error::AppError;
use job_board::gateways::{
    http_client, CloudStorageBucket, MemoryApplicantRepository, MemoryBlobStore, SupabaseClient,
};
use job_board::telemetry;
use job_board::workflows::applications::{
    ApplicantRepository, ApplicationIntakeService, BlobStore,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if args.in_memory {
        warn!("serving with in-memory stores; submissions are discarded on shutdown");
        let service = Arc::new(ApplicationIntakeService::new(
            Arc::new(MemoryBlobStore::default()),
            Arc::new(MemoryApplicantRepository::default()),
        ));
        return serve(config, service).await;
    }

    let http = http_client()?;
    let bucket = CloudStorageBucket::connect(http.clone(), config.require_cloud_storage()?).await?;
    let supabase = config.require_supabase()?;
    let applicants =
        SupabaseClient::service_role(http, &supabase.url, supabase.service_role_key.clone());
    info!(?bucket, ?applicants, "store clients initialised");

    let service = Arc::new(ApplicationIntakeService::new(
        Arc::new(bucket),
        Arc::new(applicants),
    ));
    serve(config, service).await
}

async fn serve<B, R>(
    config: AppConfig,
    service: Arc<ApplicationIntakeService<B, R>>,
) -> Result<(), AppError>
where
    B: BlobStore + 'static,
    R: ApplicantRepository + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_application_routes(service, &config.intake)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job board intake ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(readiness_flag))
        .await?;

    info!("job board intake stopped");
    Ok(())
}
