//! Rendering the combined summary in the requested presentation.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::model::OutputFormat;
use crate::text::{char_len, compile_regex, ensure_terminal, split_sentences};

pub const BULLET_PREFIX: &str = "• ";
pub const TLDR_PREFIX: &str = "TL;DR: ";

/// Sentences this short are not worth a bullet.
const MIN_BULLET_CHARS: usize = 15;
/// Clause fragments this short are dropped when splitting further.
const MIN_CLAUSE_CHARS: usize = 20;
/// Only sources longer than this get clause-level splitting.
const CLAUSE_SPLIT_SOURCE_CHARS: usize = 2000;
/// Bullets kept from the end of the list when it exceeds the cap. Matches
/// the sentences an ending extraction or recovery contributes.
const TAIL_BULLETS: usize = 3;

/// A comma or semicolon followed by a conjunction that starts a new clause.
static CLAUSE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r"[,;]\s+(?:and|but|while|however|although|meanwhile|additionally|furthermore)\s+",
    )
});

/// Render `combined` as `format`.
///
/// `source_len` is the character length of the summarized document; long
/// sources may have their bullets split at clause boundaries.
pub fn format_summary(
    combined: &str,
    format: &OutputFormat,
    source_len: usize,
    config: &PipelineConfig,
) -> String {
    match format {
        OutputFormat::BulletPoints => format_bullets(combined, source_len, config),
        OutputFormat::Tldr => format!("{TLDR_PREFIX}{}", combined.trim()),
        _ => combined.trim().to_string(),
    }
}

fn format_bullets(combined: &str, source_len: usize, config: &PipelineConfig) -> String {
    let mut sentences: Vec<String> = split_sentences(combined)
        .into_iter()
        .filter(|s| char_len(s) > MIN_BULLET_CHARS)
        .collect();

    let min_bullets = (sentences.len() / 3).max(5);
    if sentences.len() < min_bullets && source_len > CLAUSE_SPLIT_SOURCE_CHARS {
        let clauses = split_clauses(&sentences);
        debug!(
            sentences = sentences.len(),
            clauses = clauses.len(),
            min_bullets,
            "splitting bullets at clause boundaries"
        );
        if clauses.len() > sentences.len() {
            sentences = clauses;
        }
    }

    if sentences.is_empty() {
        let whole = ensure_terminal(combined.trim());
        return bullet(&whole, config);
    }

    cap_keeping_tail(&sentences, config.bullet_cap)
        .iter()
        .map(|s| bullet(&ensure_terminal(s), config))
        .collect::<Vec<_>>()
        .join("\n")
}

/// At most `cap` sentences: the leading ones plus the last few, so the
/// document's ending is never cut off.
fn cap_keeping_tail(sentences: &[String], cap: usize) -> Vec<&String> {
    if sentences.len() <= cap {
        return sentences.iter().collect();
    }
    let tail = TAIL_BULLETS.min(cap / 2).max(1);
    let head = cap - tail;
    debug!(
        sentences = sentences.len(),
        cap,
        tail,
        "capping bullets, keeping the ending"
    );
    sentences[..head]
        .iter()
        .chain(&sentences[sentences.len() - tail..])
        .collect()
}

fn split_clauses(sentences: &[String]) -> Vec<String> {
    sentences
        .iter()
        .flat_map(|s| CLAUSE_BOUNDARY.split(s))
        .map(str::trim)
        .filter(|part| char_len(part) > MIN_CLAUSE_CHARS)
        .map(str::to_string)
        .collect()
}

fn bullet(text: &str, config: &PipelineConfig) -> String {
    if config.is_emphasized(text) {
        format!("{BULLET_PREFIX}{}{text}", config.emphasis_marker)
    } else {
        format!("{BULLET_PREFIX}{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullets(combined: &str, source_len: usize) -> Vec<String> {
        format_summary(
            combined,
            &OutputFormat::BulletPoints,
            source_len,
            &PipelineConfig::default(),
        )
        .lines()
        .map(str::to_string)
        .collect()
    }

    #[test]
    fn tldr_is_prefixed() {
        let out = format_summary(
            "  The short version.  ",
            &OutputFormat::Tldr,
            500,
            &PipelineConfig::default(),
        );
        assert_eq!(out, "TL;DR: The short version.");
    }

    #[test]
    fn other_formats_are_trimmed_prose() {
        let config = PipelineConfig::default();
        for format in [
            OutputFormat::Simplified,
            OutputFormat::Detailed,
            OutputFormat::Other("haiku".into()),
        ] {
            assert_eq!(format_summary(" Plain. ", &format, 500, &config), "Plain.");
        }
    }

    #[test]
    fn short_sentences_are_dropped() {
        let out = bullets("Too short. This sentence is long enough to keep", 500);
        assert_eq!(out, vec!["• This sentence is long enough to keep."]);
    }

    #[test]
    fn emphasis_marks_matching_bullets() {
        let out = bullets(
            "The market opened higher on Monday. The final bell rang at four.",
            500,
        );
        assert_eq!(
            out,
            vec![
                "• The market opened higher on Monday.",
                "• 🎬 The final bell rang at four.",
            ]
        );
    }

    #[test]
    fn custom_marker_and_keywords() {
        let config = PipelineConfig::default()
            .with_emphasis_keywords(["verdict"])
            .with_emphasis_marker("[!] ");
        let out = format_summary(
            "The jury returned its verdict on Friday.",
            &OutputFormat::BulletPoints,
            500,
            &config,
        );
        assert_eq!(out, "• [!] The jury returned its verdict on Friday.");
    }

    #[test]
    fn long_sources_split_at_clause_boundaries() {
        let combined = "The committee reviewed the proposal in detail, and the board approved the budget for next year. \
                        Engineering shipped the release on time; however the rollout was paused for a regional outage.";
        let out = bullets(combined, 5000);
        assert_eq!(
            out,
            vec![
                "• The committee reviewed the proposal in detail.",
                "• the board approved the budget for next year.",
                "• Engineering shipped the release on time.",
                "• the rollout was paused for a regional outage.",
            ]
        );

        // Short sources keep whole sentences.
        assert_eq!(bullets(combined, 1500).len(), 2);
    }

    #[test]
    fn bullets_are_capped() {
        let combined: String = (0..40)
            .map(|i| format!("Sentence number {i} carries some content."))
            .collect::<Vec<_>>()
            .join(" ");
        let out = bullets(&combined, 50_000);
        assert_eq!(out.len(), 20);
        assert!(out.iter().all(|b| b.starts_with(BULLET_PREFIX)));
        assert_eq!(out[16], "• Sentence number 16 carries some content.");
        assert_eq!(out[17], "• Sentence number 37 carries some content.");
        assert_eq!(out[19], "• Sentence number 39 carries some content.");
    }

    #[test]
    fn small_cap_still_keeps_last_sentence() {
        let combined = "The opening sentence sets the scene. The middle sentence adds detail. \
                        The closing sentence resolves it all.";
        let config = PipelineConfig::default().with_bullet_cap(1);
        let out = format_summary(combined, &OutputFormat::BulletPoints, 500, &config);
        assert_eq!(out, "• The closing sentence resolves it all.");

        let config = PipelineConfig::default().with_bullet_cap(2);
        let out = format_summary(combined, &OutputFormat::BulletPoints, 500, &config);
        assert_eq!(
            out,
            "• The opening sentence sets the scene.\n• The closing sentence resolves it all."
        );
    }

    #[test]
    fn no_surviving_sentences_yields_single_bullet() {
        assert_eq!(bullets("Brief note", 500), vec!["• Brief note."]);
    }
}
