//! The end-to-end summarization pipeline.
//!
//! ```text
//! normalized text ─▶ segment ─▶ plan budgets ─▶ summarize each segment
//!                                                       │
//!        FormattedResult ◀─ format ◀─ recombine ◀─ recover ending
//! ```
//!
//! Everything here is synchronous and blocking. Segments are processed in
//! order on the calling thread; callers in async code run
//! [`produce_summary`] on a blocking worker.

use std::time::Instant;

use tracing::{info, warn};

use crate::budget::{apply_explicit_bounds, plan_global, plan_segment, plan_short_path};
use crate::capability::SummarizationCapability;
use crate::config::PipelineConfig;
use crate::error::{Result, SummaryError};
use crate::format::format_summary;
use crate::model::{FormattedResult, SummaryRequest};
use crate::recombine::recombine;
use crate::recovery::recover_ending;
use crate::segmenter::segment;
use crate::summarizer::{SegmentOutcome, summarize_segment, summarize_whole};
use crate::text::{char_len, word_count};

/// Documents up to this many characters are summarized in one call.
pub const SHORT_TEXT_LIMIT: usize = 2000;

const MIN_LONG_CHUNKS: usize = 4;
const MAX_LONG_CHUNKS: usize = 8;
/// Characters per chunk used to derive the long-path chunk count.
const CHARS_PER_CHUNK: usize = 500;

/// Summarize already-normalized `text` with `capability`.
///
/// The request supplies the format, detail level and optional character
/// bounds; its own `text` field is ignored. Fails only when no segment
/// produced usable text.
pub fn produce_summary(
    text: &str,
    request: &SummaryRequest,
    capability: &dyn SummarizationCapability,
    config: &PipelineConfig,
) -> Result<FormattedResult> {
    let start = Instant::now();
    let text_length = char_len(text);
    let detail = request.detail_level;

    let global = plan_global(text_length, detail);
    let global_budget = apply_explicit_bounds(global.budget, request.max_length, request.min_length);

    info!(
        capability = capability.name(),
        text_length,
        format = request.format.as_str(),
        detail = %detail,
        min_tokens = global_budget.min_tokens,
        max_tokens = global_budget.max_tokens,
        "starting summary"
    );

    let (outcomes, chunks_processed) = if text_length <= SHORT_TEXT_LIMIT {
        let budget = plan_short_path(global_budget, word_count(text));
        (vec![summarize_whole(capability, text, budget)], 1)
    } else {
        let target_chunks = (text_length / CHARS_PER_CHUNK).clamp(MIN_LONG_CHUNKS, MAX_LONG_CHUNKS);
        let segments = segment(text, Some(target_chunks));

        let mut outcomes: Vec<SegmentOutcome> = segments
            .iter()
            .map(|seg| {
                let budget = plan_segment(seg.word_count(), seg.is_last, detail);
                summarize_segment(capability, seg, budget)
            })
            .collect();

        let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
        if accepted < segments.len() {
            warn!(
                accepted,
                segments = segments.len(),
                "some segments produced no summary"
            );
        }
        recover_ending(&segments, &mut outcomes);
        (outcomes, segments.len())
    };

    if !outcomes.iter().any(SegmentOutcome::is_accepted) {
        warn!(text_length, "no segment produced usable text");
        return Err(SummaryError::NoContentProduced);
    }

    let combined = recombine(&outcomes, detail, capability);
    let summary = format_summary(&combined, &request.format, text_length, config);
    let summary_length = char_len(&summary);

    info!(
        summary_length,
        chunks_processed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "summary generated"
    );

    Ok(FormattedResult {
        summary,
        format: request.format.clone(),
        original_length: text_length,
        summary_length,
        chunks_processed,
        detail_level: detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::budget::SummaryBudget;
    use crate::capability::{InvokeOptions, LeadCapability};
    use crate::model::{DetailLevel, OutputFormat};
    use crate::text::ends_with_terminal;

    struct Fixed(String);

    impl SummarizationCapability for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn invoke(&self, _: &str, _: SummaryBudget, _: &InvokeOptions) -> std::result::Result<String, String> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl SummarizationCapability for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn invoke(&self, _: &str, _: SummaryBudget, _: &InvokeOptions) -> std::result::Result<String, String> {
            Err("capability unavailable".into())
        }
    }

    /// Fails whenever the input contains `needle`, otherwise echoes a
    /// summary naming the input's first word.
    struct FailOn(&'static str);

    impl SummarizationCapability for FailOn {
        fn name(&self) -> &str {
            "fail-on"
        }

        fn invoke(&self, text: &str, _: SummaryBudget, _: &InvokeOptions) -> std::result::Result<String, String> {
            if text.contains(self.0) {
                return Err(format!("refusing input containing {}", self.0));
            }
            let first = text.split_whitespace().next().unwrap_or_default();
            Ok(format!("A generated summary of the section starting with {first}"))
        }
    }

    /// Summarizes every section in four sentences, failing on inputs
    /// containing `needle`.
    struct FourSentences {
        needle: &'static str,
    }

    impl SummarizationCapability for FourSentences {
        fn name(&self) -> &str {
            "four-sentences"
        }

        fn invoke(&self, text: &str, _: SummaryBudget, _: &InvokeOptions) -> std::result::Result<String, String> {
            if text.contains(self.needle) {
                return Err(format!("refusing input containing {}", self.needle));
            }
            Ok("First notable event opens the section. A second notable event follows it. \
                A third notable event raises stakes. A fourth notable event closes it out."
                .to_string())
        }
    }

    /// Records the budget and options of every call.
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<(SummaryBudget, InvokeOptions)>>,
    }

    impl Recording {
        fn calls(&self) -> Vec<(SummaryBudget, InvokeOptions)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SummarizationCapability for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn invoke(&self, _: &str, budget: SummaryBudget, options: &InvokeOptions) -> std::result::Result<String, String> {
            self.calls.lock().unwrap().push((budget, options.clone()));
            Ok("A recorded summary that is comfortably longer than any threshold.".to_string())
        }
    }

    /// Eight paragraphs of 25 sentences each, about 12k characters.
    fn long_document() -> String {
        (0..8)
            .map(|p| {
                (0..25)
                    .map(|s| format!("Paragraph {p} sentence {s} describes a distinct event in order."))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn request(format: OutputFormat, detail: DetailLevel) -> SummaryRequest {
        SummaryRequest::new("").with_format(format).with_detail_level(detail)
    }

    #[test]
    fn short_tldr_uses_capability_output() {
        let text = "Word after word fills this single paragraph of input text. ".repeat(30);
        let text = text.trim();
        assert!(char_len(text) > 1700 && char_len(text) <= SHORT_TEXT_LIMIT);

        let stub = "lorem ".repeat(40);
        let stub = stub.trim().to_string();
        let result = produce_summary(
            text,
            &request(OutputFormat::Tldr, DetailLevel::Medium),
            &Fixed(stub.clone()),
            &PipelineConfig::default(),
        )
        .unwrap();

        assert_eq!(result.summary, format!("TL;DR: {stub}."));
        assert_eq!(result.chunks_processed, 1);
        assert_eq!(result.original_length, char_len(text));
        assert_eq!(result.summary_length, char_len(&result.summary));
        assert_eq!(result.format, OutputFormat::Tldr);
    }

    #[test]
    fn failing_capability_still_yields_bullets_from_the_source() {
        let text = long_document();
        assert!(char_len(&text) > 12_000);

        let result = produce_summary(
            &text,
            &request(OutputFormat::BulletPoints, DetailLevel::High),
            &Failing,
            &PipelineConfig::default(),
        )
        .unwrap();

        let bullets: Vec<&str> = result.summary.lines().collect();
        assert!(!bullets.is_empty() && bullets.len() <= 20);
        assert!(bullets.iter().all(|b| b.starts_with("• ")));
        assert!(bullets.iter().all(|b| b.contains("Paragraph")));
        assert!(bullets.last().unwrap().contains("Paragraph 7 sentence 24"));
        assert_eq!(result.chunks_processed, 8);
        assert_eq!(result.detail_level, DetailLevel::High);
    }

    #[test]
    fn ending_survives_when_last_segment_fails() {
        let text = long_document();
        let result = produce_summary(
            &text,
            &request(OutputFormat::Detailed, DetailLevel::Medium),
            &FailOn("Paragraph 7"),
            &PipelineConfig::default(),
        )
        .unwrap();

        assert!(result.summary.contains("Paragraph 7 sentence 24"));
        assert!(result.summary.contains("starting with Paragraph"));
    }

    #[test]
    fn bullet_cap_keeps_the_ending() {
        let text = long_document();
        let result = produce_summary(
            &text,
            &request(OutputFormat::BulletPoints, DetailLevel::High),
            &FourSentences { needle: "Paragraph 7" },
            &PipelineConfig::default(),
        )
        .unwrap();

        // Seven four-sentence summaries plus the last segment's extracted
        // tail exceed the 20-bullet cap.
        let bullets: Vec<&str> = result.summary.lines().collect();
        assert_eq!(bullets.len(), 20);
        assert!(result.summary.contains("Paragraph 7"));
        assert_eq!(
            bullets.last().copied(),
            Some("• Paragraph 7 sentence 24 describes a distinct event in order.")
        );
        assert_eq!(bullets[0], "• First notable event opens the section.");
    }

    #[test]
    fn each_segment_gets_its_own_budget_and_options() {
        let text = long_document();
        let recording = Recording::default();
        let result = produce_summary(
            &text,
            &request(OutputFormat::BulletPoints, DetailLevel::Medium),
            &recording,
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(result.chunks_processed, 8);

        // Every paragraph is a 250-word segment.
        let calls = recording.calls();
        assert_eq!(calls.len(), 8);
        let (last, rest) = calls.split_last().unwrap();
        for (budget, options) in rest {
            assert_eq!(*budget, plan_segment(250, false, DetailLevel::Medium));
            assert_eq!(*options, InvokeOptions::segment(false));
        }
        assert_eq!(last.0, plan_segment(250, true, DetailLevel::Medium));
        assert_eq!(last.1, InvokeOptions::segment(true));
        assert_eq!(last.1.length_penalty, Some(1.3));
        assert_ne!(last.0, rest[0].0);
    }

    #[test]
    fn explicit_bounds_reach_the_short_path_call() {
        let text = "Word after word fills this single paragraph of input text. ".repeat(30);
        let text = text.trim();
        let req = request(OutputFormat::Simplified, DetailLevel::Medium);

        let unbounded = Recording::default();
        produce_summary(text, &req, &unbounded, &PipelineConfig::default()).unwrap();
        assert_eq!(
            unbounded.calls(),
            vec![(SummaryBudget::new(100, 150), InvokeOptions::whole_document())]
        );

        let bounded = Recording::default();
        let req = req.with_bounds(Some(300), Some(400));
        produce_summary(text, &req, &bounded, &PipelineConfig::default()).unwrap();
        assert_eq!(
            bounded.calls(),
            vec![(SummaryBudget::new(50, 100), InvokeOptions::whole_document())]
        );
    }

    #[test]
    fn unknown_detail_level_is_reported_as_applied() {
        let req: SummaryRequest =
            serde_json::from_str(r#"{"text": "", "format": "tldr", "detail_level": "extreme"}"#).unwrap();
        let text = "The council met on Tuesday. It approved the new park. Residents celebrated the decision.";
        let result = produce_summary(text, &req, &LeadCapability::default(), &PipelineConfig::default()).unwrap();

        assert_eq!(result.detail_level, DetailLevel::Medium);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["detail_level"], "medium");
    }

    #[test]
    fn failed_segment_triggers_ending_recovery() {
        // Paragraph 3 opens with a sentence too short for emergency extraction.
        let text = long_document().replacen("Paragraph 3 sentence 0", "Brief. Paragraph 3 sentence 0", 1);
        let result = produce_summary(
            &text,
            &request(OutputFormat::Detailed, DetailLevel::Medium),
            &FailOn("Paragraph 3"),
            &PipelineConfig::default(),
        )
        .unwrap();

        assert!(!result.summary.contains("Brief."));
        assert!(
            result
                .summary
                .ends_with("[ENDING] Paragraph 7 sentence 22 describes a distinct event in order. \
                            Paragraph 7 sentence 23 describes a distinct event in order. \
                            Paragraph 7 sentence 24 describes a distinct event in order.")
        );
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let text = long_document();
        let req = request(OutputFormat::BulletPoints, DetailLevel::Low);
        let config = PipelineConfig::default();
        let cap = LeadCapability::default();
        let first = produce_summary(&text, &req, &cap, &config).unwrap();
        let second = produce_summary(&text, &req, &cap, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn summary_always_ends_in_terminal_punctuation() {
        let text = long_document();
        let config = PipelineConfig::default();
        let caps: [&dyn SummarizationCapability; 3] = [
            &Failing,
            &FailOn("Paragraph 3"),
            &Fixed("no punctuation at the end of this generated text".into()),
        ];
        for cap in caps {
            for detail in [DetailLevel::Low, DetailLevel::Medium, DetailLevel::High] {
                for format in [OutputFormat::Tldr, OutputFormat::Simplified, OutputFormat::BulletPoints] {
                    let result = produce_summary(&text, &request(format, detail), cap, &config).unwrap();
                    assert!(
                        ends_with_terminal(&result.summary),
                        "{} / {detail}: {:?}",
                        cap.name(),
                        result.summary.chars().last()
                    );
                }
            }
        }
    }

    #[test]
    fn nothing_usable_is_an_error() {
        let err = produce_summary(
            "   ",
            &request(OutputFormat::Tldr, DetailLevel::Medium),
            &Failing,
            &PipelineConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, SummaryError::NoContentProduced);
    }

    #[test]
    fn short_text_failure_falls_back_to_extraction() {
        let text = "The council met on Tuesday. It approved the new park. Residents celebrated the decision.";
        let result = produce_summary(
            text,
            &request(OutputFormat::Simplified, DetailLevel::Medium),
            &Failing,
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(result.summary, text);
        assert_eq!(result.chunks_processed, 1);
    }
}
