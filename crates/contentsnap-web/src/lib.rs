//! HTTP front end for the `contentsnap` summarization pipeline.
//!
//! `contentsnap-web` exposes [`produce_summary`](contentsnap::produce_summary)
//! over a small axum REST API. The pipeline is blocking, so each request
//! runs on Tokio's blocking pool behind a semaphore sized by
//! [`WebConfig::workers`]; the async handlers stay responsive while at most
//! that many summaries are in flight.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use contentsnap::{CapabilityRegistry, PipelineConfig};
//! use contentsnap_web::{WebConfig, spawn_web};
//!
//! let registry = Arc::new(CapabilityRegistry::offline()?);
//! let addr = spawn_web(registry, PipelineConfig::default(), WebConfig::default()).await?;
//! println!("Listening on http://{addr}");
//! ```
//!
//! # Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `POST` | `/summarize` | Summarize a document |
//! | `GET` | `/health` | Registered capabilities, formats, version |
//! | `GET` | `/` | Service banner |

mod api;
mod server;

pub use api::{ErrorBody, HealthResponse};

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use contentsnap::{CapabilityRegistry, PipelineConfig};
use tokio::sync::Semaphore;

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:8000`.
    pub bind_addr: SocketAddr,
    /// Summaries allowed to run at once. Default: 4.
    pub workers: usize,
    /// Largest accepted request body, in bytes. Default: 10 MiB.
    pub max_body_bytes: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            workers: 4,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

fn app_state(
    registry: Arc<CapabilityRegistry>,
    pipeline: PipelineConfig,
    config: &WebConfig,
) -> api::AppState {
    api::AppState {
        registry,
        pipeline: Arc::new(pipeline),
        workers: Arc::new(Semaphore::new(config.workers.max(1))),
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down. Bind to port 0 to
/// let the OS pick a free port.
pub async fn spawn_web(
    registry: Arc<CapabilityRegistry>,
    pipeline: PipelineConfig,
    config: WebConfig,
) -> Result<SocketAddr, String> {
    let state = app_state(registry, pipeline, &config);
    let router = server::build_router(state, config.max_body_bytes);
    server::start_server(router, config.bind_addr).await
}

/// Serve until `shutdown` resolves, then stop admitting work and wait for
/// in-flight requests to finish.
pub async fn serve<F>(
    registry: Arc<CapabilityRegistry>,
    pipeline: PipelineConfig,
    config: WebConfig,
    shutdown: F,
) -> Result<(), String>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = app_state(registry, pipeline, &config);
    let workers = state.workers.clone();
    let router = server::build_router(state, config.max_body_bytes);
    server::serve_until(router, config.bind_addr, async move {
        shutdown.await;
        workers.close();
    })
    .await
}
