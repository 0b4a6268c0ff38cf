//! HTTP surface: router assembly and server startup

pub mod openapi;
pub mod response;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};
use tokio::{signal, sync::oneshot};
use utoipa::OpenApi;

use crate::auth::{require_auth, JwtConfig};
use crate::config::Config;
use crate::cqrs::{build_mediator, AppMediator};
use crate::error::{AppError, ServerResult};
use crate::{db, features, middleware};

/// Everything the router needs, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub mediator: AppMediator,
    pub jwt: Arc<JwtConfig>,
}

impl AppState {
    pub fn new(db: PgPool, jwt: JwtConfig) -> Self {
        Self {
            mediator: build_mediator(db.clone()),
            db,
            jwt: Arc::new(jwt),
        }
    }
}

/// Connect, migrate and serve until a shutdown signal arrives
pub async fn serve(config: Config) -> ServerResult<()> {
    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let state = AppState::new(pool, JwtConfig::from_config(&config.auth));
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let (signalled_tx, signalled_rx) = oneshot::channel();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(());
    });

    // The listener stops accepting as soon as the signal arrives; in-flight
    // requests get `shutdown_timeout_secs` to finish
    let timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    tokio::select! {
        result = server.into_future() => {
            result?;
            tracing::info!("Server shut down gracefully");
        },
        _ = drain_deadline(signalled_rx, timeout) => {
            tracing::warn!(
                timeout_secs = config.server.shutdown_timeout_secs,
                "Connections still open after shutdown timeout, exiting"
            );
        },
    }

    Ok(())
}

/// Public routes at the root, authenticated feature routes under `/api/v1`
pub fn create_router(state: AppState, config: &Config) -> Router {
    let api_v1 = features::router()
        .route_layer(from_fn_with_state(state.jwt.clone(), require_auth))
        .with_state(state.mediator.clone());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state.db.clone())
        .nest("/api/v1", api_v1)
        .fallback(fallback)
        // Apply layers from innermost to outermost
        .layer(middleware::compression_layer())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "AdventureWorks HR/Sales API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/api-docs/openapi.json"
    }))
}

async fn health(State(db): State<PgPool>) -> Response {
    match db::health_check(&db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": "connected" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "database": "unreachable" })),
            )
                .into_response()
        },
    }
}

async fn openapi_json() -> impl IntoResponse {
    Json(openapi::ApiDoc::openapi())
}

async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Resolves `timeout` after the shutdown signal; never if no signal comes
async fn drain_deadline(signalled: oneshot::Receiver<()>, timeout: Duration) {
    if signalled.await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!("Waiting up to {} seconds for connections to close", timeout.as_secs());
    tokio::time::sleep(timeout).await;
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_drain_deadline_starts_at_the_signal() {
        let (tx, rx) = oneshot::channel();
        let deadline = tokio::spawn(drain_deadline(rx, Duration::from_secs(5)));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!deadline.is_finished());

        tx.send(()).unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!deadline.is_finished());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(deadline.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_deadline_without_signal_never_fires() {
        let (tx, rx) = oneshot::channel::<()>();
        drop(tx);
        let deadline = tokio::spawn(drain_deadline(rx, Duration::from_secs(1)));

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(!deadline.is_finished());
    }
}
