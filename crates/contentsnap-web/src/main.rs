//! contentsnap HTTP service.
//!
//! # Usage
//!
//! ```bash
//! OPENROUTER_KEY=sk-... cargo run -p contentsnap-web
//! OPENROUTER_KEY=sk-... cargo run -p contentsnap-web -- --port 9000 --workers 8
//! cargo run -p contentsnap-web -- --offline
//! ```
//!
//! Then:
//!
//! ```bash
//! curl -s localhost:8000/summarize \
//!   -H 'content-type: application/json' \
//!   -d '{"text": "...", "format": "tldr", "detail_level": "low"}'
//! ```

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use contentsnap::capability::openrouter::{DEFAULT_LIGHT_MODEL, DEFAULT_MODEL};
use contentsnap::{CapabilityRegistry, OpenRouterConfig, PipelineConfig};
use contentsnap_web::{WebConfig, serve};
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Summarization HTTP service.
#[derive(Parser)]
#[command(about = "HTTP service for adaptive document summarization", version)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Summaries allowed to run concurrently.
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Model for the primary capability.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Model for `simplified` output on short documents.
    #[arg(long, default_value = DEFAULT_LIGHT_MODEL)]
    light_model: String,

    /// Per-request timeout for OpenRouter calls, in seconds.
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Use offline leading-sentence extraction instead of OpenRouter.
    #[arg(long)]
    offline: bool,

    /// Keywords that mark a bullet for emphasis (replaces the defaults).
    #[arg(long, num_args = 1..)]
    emphasis: Vec<String>,
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // 1. Build the capability registry before binding so a bad setup fails fast.
    let registry = if args.offline {
        CapabilityRegistry::offline()
    } else {
        let api_key = std::env::var("OPENROUTER_KEY").map_err(|_| {
            "Set OPENROUTER_KEY env var to your OpenRouter API key, or pass --offline"
        })?;
        let config = OpenRouterConfig::default()
            .with_model(&args.model)
            .with_timeout(Duration::from_secs(args.timeout));
        CapabilityRegistry::openrouter(&api_key, config, &args.light_model, Handle::current())
    }
    .map_err(|e| e.to_string())?;

    // 2. Pipeline settings shared by every request.
    let mut pipeline = PipelineConfig::default();
    if !args.emphasis.is_empty() {
        pipeline = pipeline.with_emphasis_keywords(args.emphasis.iter().cloned());
    }

    // 3. Serve until Ctrl-C.
    let config = WebConfig {
        bind_addr: (args.host, args.port).into(),
        workers: args.workers,
        ..Default::default()
    };
    info!(
        models = ?registry.names(),
        workers = config.workers,
        "starting contentsnap web service"
    );
    serve(Arc::new(registry), pipeline, config, shutdown_signal()).await
}
