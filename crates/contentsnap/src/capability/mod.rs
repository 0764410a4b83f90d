//! The summarization capability seam.
//!
//! The pipeline never talks to a model directly. It calls a
//! [`SummarizationCapability`]: text plus a token budget in, summary text
//! out. Concrete capabilities are registered by name in a
//! [`CapabilityRegistry`] at startup and chosen per request by the caller.
//!
//! - [`openrouter`]: abstractive summaries from the OpenRouter chat API.
//! - [`lead`]: deterministic leading-sentence extraction, for offline use.

pub mod lead;
pub mod openrouter;
pub mod registry;

pub use lead::LeadCapability;
pub use openrouter::{OpenRouterCapability, OpenRouterConfig};
pub use registry::{CapabilityRegistry, CapabilityRegistryBuilder};

use crate::budget::SummaryBudget;

/// Decoding options passed alongside each invocation.
///
/// Capabilities honour what they can and ignore the rest; a remote chat
/// API has no beam search, for example.
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeOptions {
    /// Greedy/deterministic decoding (no sampling).
    pub deterministic: bool,
    /// Cut input that exceeds the capability's context instead of failing.
    pub truncate_input: bool,
    pub early_stopping: bool,
    pub beam_width: Option<u32>,
    pub length_penalty: Option<f32>,
    pub repetition_penalty: Option<f32>,
}

impl InvokeOptions {
    /// Options for summarizing a short document in one call.
    pub fn whole_document() -> Self {
        Self {
            deterministic: true,
            truncate_input: true,
            early_stopping: true,
            beam_width: None,
            length_penalty: None,
            repetition_penalty: None,
        }
    }

    /// Options for one segment of a long document.
    pub fn segment(is_last: bool) -> Self {
        Self {
            deterministic: true,
            truncate_input: true,
            early_stopping: true,
            beam_width: Some(4),
            length_penalty: Some(if is_last { 1.3 } else { 1.2 }),
            repetition_penalty: Some(1.1),
        }
    }

    /// Options for the second-level pass over combined segment summaries.
    pub fn consolidation() -> Self {
        Self {
            deterministic: true,
            truncate_input: true,
            early_stopping: false,
            beam_width: Some(4),
            length_penalty: Some(1.2),
            repetition_penalty: None,
        }
    }
}

/// An abstractive summarizer treated as a black box.
///
/// `invoke` blocks until the summary is ready. It may fail, or return
/// short or empty text; the pipeline absorbs both through its extraction
/// fallbacks. Implementations must be safe to call from several worker
/// threads at once.
pub trait SummarizationCapability: Send + Sync {
    /// Registry name, used in logs.
    fn name(&self) -> &str;

    fn invoke(
        &self,
        text: &str,
        budget: SummaryBudget,
        options: &InvokeOptions,
    ) -> Result<String, String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_segment_uses_stronger_length_penalty() {
        assert_eq!(InvokeOptions::segment(true).length_penalty, Some(1.3));
        assert_eq!(InvokeOptions::segment(false).length_penalty, Some(1.2));
        assert_eq!(InvokeOptions::segment(false).beam_width, Some(4));
    }

    #[test]
    fn all_presets_are_deterministic() {
        for options in [
            InvokeOptions::whole_document(),
            InvokeOptions::segment(true),
            InvokeOptions::consolidation(),
        ] {
            assert!(options.deterministic);
            assert!(options.truncate_input);
        }
    }
}
