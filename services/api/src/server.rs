use crate::cli::ServeArgs;
use crate::infra::{current_quarter, directory_from_config, AppState};
use crate::routes::with_award_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recognition::config::AppConfig;
use recognition::error::AppError;
use recognition::telemetry;
use recognition::workflows::award::{AwardService, InMemoryAwardRepository};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryAwardRepository::default());
    let directory = Arc::new(directory_from_config(&config.directory));
    let service = Arc::new(AwardService::new(repository, directory));

    // Standalone mode opens the calendar quarter itself; a real host
    // scheduler would drive POST /api/v1/award/periods instead.
    let pool = service.open_period(current_quarter())?;
    info!(
        candidates = pool.candidates.len(),
        "seeded candidate pool from configured roster"
    );

    let app = with_award_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "quarterly recognition service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
