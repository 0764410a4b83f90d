//! Per-segment summarization with a three-tier fallback ladder.
//!
//! Each segment is offered to the capability first. When the capability
//! returns something too short, the segment's own sentences are extracted
//! instead; when the capability fails outright, a smaller emergency
//! extraction is used. The capability is never re-asked.
//!
//! Final segments extract from the end of the text rather than the start,
//! so the document's conclusion survives a failed generation.

use tracing::{info, warn};

use crate::budget::SummaryBudget;
use crate::capability::{InvokeOptions, SummarizationCapability};
use crate::segmenter::Segment;
use crate::text::{char_len, ensure_terminal, preview, split_sentences};

/// Generated output for the last segment must be longer than this.
const GENERATED_MIN_CHARS_LAST: usize = 20;
/// Generated output for any other segment must be longer than this.
const GENERATED_MIN_CHARS: usize = 30;

/// Sentences kept by the regular fallback.
const FALLBACK_TAIL_SENTENCES: usize = 5;
const FALLBACK_HEAD_SENTENCES: usize = 3;

/// Sentences kept by the emergency fallback of a last segment.
const EMERGENCY_TAIL_SENTENCES: usize = 3;
/// Emergency extractions must be longer than this.
const EMERGENCY_MIN_CHARS: usize = 15;

/// How a segment ended up represented in the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// The capability produced usable text.
    Generated(String),
    /// The capability's output was too short; sentences were extracted.
    FallbackExtracted(String),
    /// The capability failed; a minimal extraction was used.
    EmergencyExtracted(String),
    /// Ending text re-extracted by coverage recovery.
    Recovered(String),
    /// Nothing usable.
    Failed,
}

impl SegmentOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            SegmentOutcome::Generated(t)
            | SegmentOutcome::FallbackExtracted(t)
            | SegmentOutcome::EmergencyExtracted(t)
            | SegmentOutcome::Recovered(t) => Some(t),
            SegmentOutcome::Failed => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.text().is_some()
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SegmentOutcome::Generated(_) => "generated",
            SegmentOutcome::FallbackExtracted(_) => "fallback",
            SegmentOutcome::EmergencyExtracted(_) => "emergency",
            SegmentOutcome::Recovered(_) => "recovered",
            SegmentOutcome::Failed => "failed",
        }
    }
}

/// Summarize one segment of a multi-segment document.
pub fn summarize_segment(
    capability: &dyn SummarizationCapability,
    segment: &Segment,
    budget: SummaryBudget,
) -> SegmentOutcome {
    let options = InvokeOptions::segment(segment.is_last);
    let outcome = match capability.invoke(&segment.text, budget, &options) {
        Ok(output) => {
            let output = output.trim();
            let threshold = if segment.is_last {
                GENERATED_MIN_CHARS_LAST
            } else {
                GENERATED_MIN_CHARS
            };
            if char_len(output) > threshold {
                SegmentOutcome::Generated(output.to_string())
            } else {
                warn!(
                    segment = segment.index,
                    ending = segment.is_last,
                    output_chars = char_len(output),
                    "capability output too short, extracting sentences"
                );
                fallback_extract(segment)
            }
        }
        Err(e) => {
            warn!(
                segment = segment.index,
                ending = segment.is_last,
                error = %e,
                "capability failed, using emergency extraction"
            );
            emergency_extract(segment)
        }
    };

    match outcome.text() {
        Some(text) => info!(
            segment = segment.index,
            ending = segment.is_last,
            kind = outcome.kind(),
            chars = char_len(text),
            preview = %preview(text, 80),
            "segment summarized"
        ),
        None => warn!(segment = segment.index, "segment produced no usable text"),
    }
    outcome
}

/// Summarize a short document in a single capability call.
///
/// Non-empty output is accepted as-is. Empty output or a failure runs the
/// same ladder as a final segment.
pub fn summarize_whole(
    capability: &dyn SummarizationCapability,
    text: &str,
    budget: SummaryBudget,
) -> SegmentOutcome {
    let document = Segment {
        index: 0,
        text: text.to_string(),
        is_last: true,
    };
    match capability.invoke(text, budget, &InvokeOptions::whole_document()) {
        Ok(output) if !output.trim().is_empty() => {
            SegmentOutcome::Generated(output.trim().to_string())
        }
        Ok(_) => {
            warn!("capability returned an empty summary, extracting sentences");
            fallback_extract(&document)
        }
        Err(e) => {
            warn!(error = %e, "capability failed, using emergency extraction");
            emergency_extract(&document)
        }
    }
}

/// Second tier: extract whole sentences from the segment.
///
/// Last segments keep their final sentences; others keep their opening
/// sentences but need at least two to be worth extracting.
pub fn fallback_extract(segment: &Segment) -> SegmentOutcome {
    let sentences = split_sentences(&segment.text);

    if segment.is_last {
        if sentences.is_empty() {
            return SegmentOutcome::Failed;
        }
        let start = sentences.len().saturating_sub(FALLBACK_TAIL_SENTENCES);
        let tail = sentences[start..].join(" ");
        return SegmentOutcome::FallbackExtracted(ensure_terminal(&tail));
    }

    if sentences.len() >= 2 {
        let head: Vec<&str> = sentences
            .iter()
            .take(FALLBACK_HEAD_SENTENCES)
            .map(String::as_str)
            .collect();
        return SegmentOutcome::FallbackExtracted(head.join(" "));
    }
    SegmentOutcome::Failed
}

/// Third tier: the smallest extraction still likely to carry meaning.
pub fn emergency_extract(segment: &Segment) -> SegmentOutcome {
    let sentences = split_sentences(&segment.text);
    let extracted = if segment.is_last {
        let start = sentences.len().saturating_sub(EMERGENCY_TAIL_SENTENCES);
        sentences[start..].join(" ")
    } else {
        sentences.first().cloned().unwrap_or_default()
    };

    if char_len(&extracted) > EMERGENCY_MIN_CHARS {
        SegmentOutcome::EmergencyExtracted(extracted)
    } else {
        SegmentOutcome::Failed
    }
}
