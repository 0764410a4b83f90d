//! Request and result types exchanged with callers.
//!
//! These serialize to the JSON shape the HTTP service exposes, so the web
//! crate reuses them directly as request/response bodies.

use serde::{Deserialize, Serialize};
use std::fmt;

// ── Detail level ───────────────────────────────────────────────────

/// How much of the source the summary should retain.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum DetailLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl DetailLevel {
    /// Parse a detail level. Unknown values fall back to [`DetailLevel::Medium`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => DetailLevel::Low,
            "high" => DetailLevel::High,
            _ => DetailLevel::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailLevel::Low => "low",
            DetailLevel::Medium => "medium",
            DetailLevel::High => "high",
        }
    }

    /// All accepted level names, in ascending order of detail.
    pub fn names() -> [&'static str; 3] {
        ["low", "medium", "high"]
    }
}

impl From<String> for DetailLevel {
    fn from(value: String) -> Self {
        DetailLevel::parse(&value)
    }
}

impl From<DetailLevel> for String {
    fn from(value: DetailLevel) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Output format ──────────────────────────────────────────────────

/// Presentation of the final summary.
///
/// Unrecognized names are kept verbatim in [`OutputFormat::Other`] and
/// rendered as plain prose, the same as `simplified` and `detailed`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum OutputFormat {
    #[default]
    BulletPoints,
    Tldr,
    Simplified,
    Detailed,
    Other(String),
}

impl OutputFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "bullet_points" => OutputFormat::BulletPoints,
            "tldr" => OutputFormat::Tldr,
            "simplified" => OutputFormat::Simplified,
            "detailed" => OutputFormat::Detailed,
            other => OutputFormat::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OutputFormat::BulletPoints => "bullet_points",
            OutputFormat::Tldr => "tldr",
            OutputFormat::Simplified => "simplified",
            OutputFormat::Detailed => "detailed",
            OutputFormat::Other(name) => name,
        }
    }

    /// The formats with dedicated handling.
    pub fn names() -> [&'static str; 4] {
        ["bullet_points", "tldr", "simplified", "detailed"]
    }
}

impl From<String> for OutputFormat {
    fn from(value: String) -> Self {
        OutputFormat::parse(&value)
    }
}

impl From<OutputFormat> for String {
    fn from(value: OutputFormat) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Request / result ───────────────────────────────────────────────

/// A summarization request.
///
/// `max_length` / `min_length` are optional character bounds that override
/// the computed whole-document token budget. Zero is treated as absent.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SummaryRequest {
    pub text: String,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

impl SummaryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_detail_level(mut self, detail_level: DetailLevel) -> Self {
        self.detail_level = detail_level;
        self
    }

    /// Set explicit character bounds for the summary.
    pub fn with_bounds(mut self, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }
}

/// The formatted summary plus bookkeeping about how it was produced.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FormattedResult {
    pub summary: String,
    pub format: OutputFormat,
    /// Length of the normalized input, in characters.
    pub original_length: usize,
    /// Length of `summary`, in characters.
    pub summary_length: usize,
    pub chunks_processed: usize,
    /// The level actually applied, not the request's raw value: an
    /// unrecognized `detail_level` such as `"extreme"` is reported as
    /// `"medium"`.
    pub detail_level: DetailLevel,
}
