//! Application startup and lifecycle management.

use crate::config::PortalConfig;
use crate::handlers;
use crate::services::{BoardEvents, BoardService, MongoNotifier, Notifier, PortalDb, TokenService};
use crate::workflow::Policy;
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};
use portal_core::error::AppError;
use portal_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: PortalConfig,
    pub db: PortalDb,
    pub tokens: TokenService,
    pub board: BoardService,
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.allowed_origins);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/navigation", get(handlers::get_navigation))
        .route(
            "/vacations",
            get(handlers::list_vacations).post(handlers::submit_vacation),
        )
        .route("/vacations/:id", get(handlers::get_vacation))
        .route(
            "/stock-requests",
            get(handlers::list_stock_requests).post(handlers::submit_stock_request),
        )
        .route("/stock-requests/:id", get(handlers::get_stock_request))
        .route(
            "/department-requests",
            get(handlers::list_department_requests).post(handlers::submit_department_request),
        )
        .route(
            "/department-requests/:id",
            get(handlers::get_department_request),
        )
        .route("/board/events", get(handlers::board_events))
        .route("/board/:kind", get(handlers::get_board))
        .route("/board/:kind/:id/move", post(handlers::move_card))
        .route("/notifications", get(handlers::list_notifications))
        .route("/notifications/unread-count", get(handlers::unread_count))
        .route("/notifications/read-all", post(handlers::mark_all_read))
        .route("/notifications/:id/read", post(handlers::mark_read))
        .route(
            "/notices",
            get(handlers::list_notices).post(handlers::publish_notice),
        )
        .route("/notices/:id", delete(handlers::archive_notice))
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipped.", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    pub async fn build(config: PortalConfig) -> Result<Self, AppError> {
        Self::build_with_notifier(config, |db| Arc::new(MongoNotifier::new(db.clone()))).await
    }

    /// Build with a custom notification channel in place of the inbox writer.
    pub async fn build_with_notifier<F>(config: PortalConfig, notifier: F) -> Result<Self, AppError>
    where
        F: FnOnce(&PortalDb) -> Arc<dyn Notifier>,
    {
        let db = PortalDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;

        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let policy = Policy::new(config.workflow.purchasing_department.as_str());
        let notifier = notifier(&db);
        let events = BoardEvents::new(config.workflow.board_event_capacity);

        let state = AppState {
            config: config.clone(),
            db: db.clone(),
            tokens: TokenService::new(&config.auth),
            board: BoardService::new(db, policy, notifier, events),
        };

        let router = build_router(state.clone());

        // Port 0 picks a random port, which the tests rely on.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            purchasing_department = %config.workflow.purchasing_department,
            "Portal service listening"
        );

        Ok(Self {
            port,
            listener,
            router,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &PortalDb {
        &self.state.db
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until Ctrl+C or SIGTERM, then drain in-flight requests.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
