//! HTTP API server.
//!
//! Two endpoints:
//! - `GET /health` - liveness probe (204)
//! - `GET /check/{email}` - runs a full check, returns the JSON result
//!
//! The server runs until the shutdown token fires, then drains in-flight
//! requests.

mod handlers;

use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::checker::EmailChecker;

use handlers::{check_email_handler, health_handler};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<EmailChecker>,
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/check/{email}", get(check_email_handler))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Creates and runs the API server until `shutdown` fires.
pub async fn start_server(
    port: u16,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind API server to port {}: {}", port, e))?;

    log::info!("API server listening on http://0.0.0.0:{}/", port);
    log::info!("  - Health: http://127.0.0.1:{}/health", port);
    log::info!("  - Check:  http://127.0.0.1:{}/check/{{email}}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| anyhow::anyhow!("API server error: {}", e))?;

    Ok(())
}

/// Request log line: method, path, status and latency.
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} ({:.1?})",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}
