//! Errors surfaced by the summarization pipeline.
//!
//! Per-segment capability failures and a failed consolidation pass never
//! appear here: they are absorbed by extraction fallbacks and only logged.

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, SummaryError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SummaryError {
    /// The input is shorter than the minimum the pipeline accepts.
    #[error("Text too short. Minimum {min} characters required (got {len}).")]
    InputTooShort { len: usize, min: usize },

    /// No summarization capability was registered at startup.
    #[error("no summarization capability is available")]
    NoCapabilityAvailable,

    /// A capability could not be constructed (bad client settings, no
    /// runtime).
    #[error("failed to set up capability: {0}")]
    CapabilitySetup(String),

    /// A capability name or alias that the registry does not know.
    #[error("unknown summarization capability '{0}'")]
    UnknownCapability(String),

    /// Every segment and the ending recovery produced nothing usable.
    #[error("no content could be summarized")]
    NoContentProduced,
}
