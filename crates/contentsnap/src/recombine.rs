//! Recombination of segment outcomes into one combined summary.

use tracing::{debug, info, warn};

use crate::budget::plan_consolidation;
use crate::capability::{InvokeOptions, SummarizationCapability};
use crate::model::DetailLevel;
use crate::summarizer::SegmentOutcome;
use crate::text::{char_len, ensure_terminal, join_fragments, word_count};

/// Up to this many outcomes are always joined directly.
const DIRECT_JOIN_LIMIT: usize = 3;

/// Low-detail combinations longer than this get a consolidation pass.
const CONSOLIDATION_THRESHOLD: usize = 8000;

/// Join accepted outcomes in order, consolidating long low-detail results
/// with one more capability call.
///
/// A failed or empty consolidation keeps the uncompressed text. The result
/// always ends in terminal punctuation.
pub fn recombine(
    outcomes: &[SegmentOutcome],
    detail: DetailLevel,
    capability: &dyn SummarizationCapability,
) -> String {
    let texts: Vec<&str> = outcomes.iter().filter_map(SegmentOutcome::text).collect();
    let combined = join_fragments(&texts);

    if detail == DetailLevel::High || texts.len() <= DIRECT_JOIN_LIMIT {
        debug!(outcomes = texts.len(), detail = %detail, "joined outcomes directly");
        return ensure_terminal(&combined);
    }

    if detail == DetailLevel::Low && char_len(&combined) > CONSOLIDATION_THRESHOLD {
        let budget = plan_consolidation(word_count(&combined));
        info!(
            chars = char_len(&combined),
            min_tokens = budget.min_tokens,
            max_tokens = budget.max_tokens,
            "consolidating combined summary"
        );
        match capability.invoke(&combined, budget, &InvokeOptions::consolidation()) {
            Ok(output) if !output.trim().is_empty() => return ensure_terminal(output.trim()),
            Ok(_) => warn!("consolidation returned nothing, keeping combined text"),
            Err(e) => warn!(error = %e, "consolidation failed, keeping combined text"),
        }
    }

    ensure_terminal(&combined)
}
