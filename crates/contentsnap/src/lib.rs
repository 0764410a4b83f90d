//! Adaptive segmentation and hierarchical summarization.
//!
//! `contentsnap` turns a document of any length into a bounded, well-formed
//! summary. The actual compression is delegated to a
//! [`SummarizationCapability`]: a black box that takes text and a token
//! budget and returns summary text, and that may fail or return too little.
//! This crate does everything around it:
//!
//! - split long text into segments the capability can handle
//! - give each segment an output budget, more generous for the ending
//! - absorb failed or degenerate segment output by extracting sentences
//! - make sure the document's conclusion is represented
//! - join segment summaries and optionally compress them once more
//! - render bullets, a TL;DR line, or plain prose
//!
//! # Getting started
//!
//! ```
//! use contentsnap::prelude::*;
//!
//! let raw = "The council met on Tuesday to discuss the new park. \
//!            After a long debate it approved the budget. \
//!            Residents celebrated the final decision.";
//! validate_input(raw)?;
//! let text = normalize(raw);
//!
//! let request = SummaryRequest::new(raw).with_format(OutputFormat::Tldr);
//! let capability = LeadCapability::default();
//! let result = produce_summary(&text, &request, &capability, &PipelineConfig::default())?;
//!
//! assert!(result.summary.starts_with("TL;DR: "));
//! assert_eq!(result.chunks_processed, 1);
//! # Ok::<(), contentsnap::SummaryError>(())
//! ```
//!
//! # Where to find things
//!
//! | Stage | Module |
//! |-------|--------|
//! | Input checks and cleanup | [`normalize`] |
//! | Segmentation | [`segmenter`] |
//! | Token budgets | [`budget`] |
//! | Per-segment fallback ladder | [`summarizer`] |
//! | Ending recovery | [`recovery`] |
//! | Joining and consolidation | [`recombine`] |
//! | Presentation | [`format`] |
//! | Orchestration | [`pipeline`] |
//! | Capability trait, registry, implementations | [`capability`] |
//!
//! # Concurrency
//!
//! [`produce_summary`] is synchronous and processes segments in order. It
//! holds no shared mutable state, so any number of calls may run at once on
//! separate threads. The only shared object is the read-only
//! [`CapabilityRegistry`]. Async callers should run it on a blocking pool
//! (see the `contentsnap-web` crate).

pub mod budget;
pub mod capability;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod prelude;
pub mod recombine;
pub mod recovery;
pub mod segmenter;
pub mod summarizer;
pub mod text;

pub use budget::SummaryBudget;
pub use capability::{
    CapabilityRegistry, InvokeOptions, LeadCapability, OpenRouterCapability, OpenRouterConfig,
    SummarizationCapability,
};
pub use config::PipelineConfig;
pub use error::{Result, SummaryError};
pub use model::{DetailLevel, FormattedResult, OutputFormat, SummaryRequest};
pub use normalize::{normalize, validate_input};
pub use pipeline::produce_summary;

/// Crate version, reported by the CLI and the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
