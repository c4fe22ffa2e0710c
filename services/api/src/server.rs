use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryPortfolioRepository, StaticSubscriberDirectory, StubCheckoutGateway,
};
use crate::routes::with_advisor_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use signal_core::advisor::portfolio::AdvisorService;
use signal_core::advisor::regime::StaticRegimeSource;
use signal_core::config::AppConfig;
use signal_core::error::AppError;
use signal_core::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryPortfolioRepository::default());
    let regimes = Arc::new(StaticRegimeSource::weekly());
    let subscribers = Arc::new(StaticSubscriberDirectory::with_members(
        config.advisor.subscribers.iter().cloned(),
    ));
    let checkout = Arc::new(StubCheckoutGateway);
    let advisor_service = Arc::new(AdvisorService::new(repository, regimes, subscribers));

    let app = with_advisor_routes(advisor_service, checkout)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "regime advisor service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
