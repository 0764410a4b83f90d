//! Axum server setup and router construction.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::api::{self, AppState};

/// Build the full axum router.
///
/// CORS is wide open: the service is meant to be called from browser
/// extensions and pages on any origin.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/summarize", post(api::summarize))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
}

async fn bind(bind_addr: SocketAddr) -> Result<(TcpListener, SocketAddr), String> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| format!("failed to bind {bind_addr}: {e}"))?;
    let addr = listener
        .local_addr()
        .map_err(|e| format!("failed to read bound address: {e}"))?;
    Ok((listener, addr))
}

/// Start the axum server on a background task and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> Result<SocketAddr, String> {
    let (listener, addr) = bind(bind_addr).await?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!(error = %e, "web server stopped");
        }
    });

    info!(%addr, "contentsnap web server listening");
    Ok(addr)
}

/// Run the server on the current task until `shutdown` resolves.
pub async fn serve_until<F>(router: Router, bind_addr: SocketAddr, shutdown: F) -> Result<(), String>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (listener, addr) = bind(bind_addr).await?;
    info!(%addr, "contentsnap web server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| format!("web server failed: {e}"))?;

    info!("web server shut down");
    Ok(())
}
