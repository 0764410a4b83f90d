//! Convenience re-exports for common `contentsnap` types.
//!
//! ```ignore
//! use contentsnap::prelude::*;
//! ```
//!
//! Covers running the pipeline end to end: input checks, the request and
//! result types, the capability trait with its registry and built-in
//! implementations, and pipeline configuration. Stage-level functions
//! (segmentation, budgets, extraction) stay in their modules.

// ── Input ───────────────────────────────────────────────────────────
pub use crate::normalize::{normalize, validate_input};

// ── Request / result ────────────────────────────────────────────────
pub use crate::model::{DetailLevel, FormattedResult, OutputFormat, SummaryRequest};

// ── Pipeline ────────────────────────────────────────────────────────
pub use crate::config::PipelineConfig;
pub use crate::error::SummaryError;
pub use crate::pipeline::produce_summary;

// ── Capabilities ────────────────────────────────────────────────────
pub use crate::budget::SummaryBudget;
pub use crate::capability::{
    CapabilityRegistry, InvokeOptions, LeadCapability, OpenRouterCapability, OpenRouterConfig,
    SummarizationCapability,
};
