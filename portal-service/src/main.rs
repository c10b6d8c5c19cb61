use portal_core::observability::init_tracing;
use portal_service::config::PortalConfig;
use portal_service::services::init_metrics;
use portal_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Recorder first, so nothing recorded during startup is lost.
    init_metrics();

    let config = PortalConfig::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    init_tracing(
        "portal-service",
        &config.common.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start portal service: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    application.run_until_stopped().await
}
