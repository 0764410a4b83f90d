//! Summarize a document from the command line.
//!
//! Reads the OpenRouter API key from the `OPENROUTER_KEY` environment
//! variable unless `--offline` is given.
//!
//! # Examples
//!
//! ```sh
//! # Bullet points from a file
//! contentsnap --file report.txt
//!
//! # One-line TL;DR from stdin, low detail
//! cat article.md | contentsnap --stdin --format tldr --detail low
//!
//! # No network: leading-sentence extraction
//! contentsnap --text "..." --offline --json
//!
//! # Custom emphasis keywords for bullets
//! contentsnap --file minutes.txt --emphasis verdict outcome
//! ```

use std::io::{self, Read};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use contentsnap::capability::registry::LIGHT;
use contentsnap::capability::openrouter::{DEFAULT_LIGHT_MODEL, DEFAULT_MODEL};
use contentsnap::prelude::*;
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Summarize a document of any length.
///
/// Reads the API key from the OPENROUTER_KEY environment variable.
#[derive(Parser)]
#[command(name = "contentsnap", version)]
struct Cli {
    // ── Input ──────────────────────────────────────────────────
    /// Read the document from a file
    #[arg(long, conflicts_with_all = ["stdin", "text"])]
    file: Option<String>,

    /// Read the document from stdin
    #[arg(long, conflicts_with = "text")]
    stdin: bool,

    /// Document text given inline
    #[arg(long)]
    text: Option<String>,

    // ── Output ─────────────────────────────────────────────────
    /// Presentation: bullet_points, tldr, simplified, detailed
    #[arg(long, default_value = "bullet_points")]
    format: String,

    /// Detail level: low, medium, high
    #[arg(long, default_value = "medium")]
    detail: String,

    /// Upper bound on summary length, in characters
    #[arg(long)]
    max_length: Option<usize>,

    /// Lower bound on summary length, in characters
    #[arg(long)]
    min_length: Option<usize>,

    /// Print the full result as JSON instead of the summary text
    #[arg(long)]
    json: bool,

    /// Keywords that mark a bullet for emphasis (replaces the defaults)
    #[arg(long, num_args = 1..)]
    emphasis: Vec<String>,

    // ── Capabilities ───────────────────────────────────────────
    /// Model for the primary capability
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Model for `simplified` output on short documents
    #[arg(long, default_value = DEFAULT_LIGHT_MODEL)]
    light_model: String,

    /// Per-request timeout for OpenRouter calls, in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Use offline leading-sentence extraction instead of OpenRouter
    #[arg(long)]
    offline: bool,
}

// ── Helpers ────────────────────────────────────────────────────────

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_input(cli: &Cli) -> Result<String, String> {
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read input file '{path}': {e}"));
    }
    if cli.stdin {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        return Ok(buf);
    }
    cli.text
        .clone()
        .ok_or_else(|| "provide --file, --stdin, or --text".to_string())
}

fn build_registry(cli: &Cli) -> Result<CapabilityRegistry, String> {
    if cli.offline {
        return CapabilityRegistry::offline().map_err(|e| e.to_string());
    }
    let api_key = std::env::var("OPENROUTER_KEY").map_err(|_| {
        "Set OPENROUTER_KEY env var to your OpenRouter API key, or pass --offline".to_string()
    })?;
    let config = OpenRouterConfig::default()
        .with_model(&cli.model)
        .with_timeout(Duration::from_secs(cli.timeout));
    CapabilityRegistry::openrouter(&api_key, config, &cli.light_model, Handle::current())
        .map_err(|e| e.to_string())
}

async fn summarize(cli: &Cli) -> Result<String, String> {
    let raw = read_input(cli)?;
    validate_input(&raw).map_err(|e| e.to_string())?;
    let text = normalize(&raw);

    let request = SummaryRequest::new(raw)
        .with_format(OutputFormat::parse(&cli.format))
        .with_detail_level(DetailLevel::parse(&cli.detail))
        .with_bounds(cli.min_length, cli.max_length);

    let mut config = PipelineConfig::default();
    if !cli.emphasis.is_empty() {
        config = config.with_emphasis_keywords(cli.emphasis.iter().cloned());
    }

    let registry = Arc::new(build_registry(cli)?);
    let capability = registry
        .select(text.chars().count(), &request.format)
        .map_err(|e| e.to_string())?;
    info!(
        capability = capability.name(),
        light_available = registry.contains(LIGHT),
        "capability selected"
    );

    // The capability blocks on the runtime, so run off the async workers.
    let result = tokio::task::spawn_blocking(move || {
        produce_summary(&text, &request, capability.as_ref(), &config)
    })
    .await
    .map_err(|e| format!("summary task failed: {e}"))?
    .map_err(|e| e.to_string())?;

    if cli.json {
        serde_json::to_string_pretty(&result).map_err(|e| format!("failed to encode result: {e}"))
    } else {
        Ok(result.summary)
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    match summarize(&cli).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
