use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::risk_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use early_risk::config::AppConfig;
use early_risk::error::AppError;
use early_risk::telemetry;
use std::sync::atomic::Ordering;
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
    let app_state = AppState::new(prometheus_handle);
    let readiness_flag = app_state.readiness.clone();

    let app = risk_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "early risk scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
