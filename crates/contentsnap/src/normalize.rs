//! Input validation and text normalization.
//!
//! Runs before the pipeline proper: callers validate the raw text, then hand
//! the normalized string to [`produce_summary`](crate::pipeline::produce_summary).
//! Normalization is pure; the same input always yields the same output.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, SummaryError};
use crate::text::{char_len, compile_regex};

/// Minimum accepted input length, in characters, after trimming.
pub const MIN_INPUT_CHARS: usize = 50;

/// Typographic characters rewritten to plain ASCII equivalents.
const CHAR_REPLACEMENTS: &[(char, &str)] = &[
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2026}', "..."),
    ('\u{2605}', "*"),
];

/// Anything that is not a word character, whitespace, or common punctuation.
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r#"[^\w\s.,!?;:\-()"'\[\]*/]"#));

/// A line break, optional blank space, and another line break.
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"\n[^\S\n]*\n\s*"));

/// Whitespace runs that contain no paragraph marker.
static INLINE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"[^\S\u{2029}]+"));

/// Placeholder for paragraph breaks while inline whitespace is collapsed.
const PARAGRAPH_MARK: &str = "\u{2029}";

/// Reject input that is too short to summarize.
///
/// Exactly [`MIN_INPUT_CHARS`] characters is accepted.
pub fn validate_input(raw: &str) -> Result<()> {
    let len = char_len(raw.trim());
    if len < MIN_INPUT_CHARS {
        return Err(SummaryError::InputTooShort {
            len,
            min: MIN_INPUT_CHARS,
        });
    }
    Ok(())
}

/// Normalize raw input for segmentation.
///
/// Applies NFKD, canonicalizes typographic punctuation, blanks out symbols,
/// and collapses whitespace. Paragraph breaks survive as `"\n\n"`.
pub fn normalize(raw: &str) -> String {
    let decomposed: String = raw.nfkd().collect();

    let mut replaced = String::with_capacity(decomposed.len());
    for c in decomposed.chars() {
        match CHAR_REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => replaced.push_str(to),
            None => replaced.push(c),
        }
    }

    let cleaned = DISALLOWED.replace_all(&replaced, " ");
    let marked = PARAGRAPH_BREAK.replace_all(&cleaned, PARAGRAPH_MARK);
    let collapsed = INLINE_WHITESPACE.replace_all(&marked, " ");

    collapsed
        .split(PARAGRAPH_MARK)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
