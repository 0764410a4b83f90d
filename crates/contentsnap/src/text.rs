//! Character-level text helpers shared by every pipeline stage.
//!
//! Lengths are measured in Unicode scalar values, never bytes, so thresholds
//! behave the same for accented or non-Latin input. Nothing here slices a
//! `str` by byte range.

use regex::Regex;

/// Characters that end a sentence.
pub const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Whether `c` ends a sentence.
pub fn is_terminal(c: char) -> bool {
    TERMINAL_PUNCTUATION.contains(&c)
}

/// Length of `text` in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whether the trimmed text ends with `.`, `!` or `?`.
pub fn ends_with_terminal(text: &str) -> bool {
    text.trim_end().chars().last().is_some_and(is_terminal)
}

/// Trim `text` and append a period if it lacks terminal punctuation.
///
/// Empty input stays empty.
pub fn ensure_terminal(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() || ends_with_terminal(trimmed) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

/// Split on sentence-ending punctuation followed by whitespace.
///
/// The punctuation stays attached to its sentence. Pieces are trimmed and
/// empty pieces are dropped; no length filter is applied here.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut after_terminal = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if after_terminal && c.is_whitespace() {
            while chars.next_if(|next| next.is_whitespace()).is_some() {}
            push_trimmed(&mut sentences, &mut current);
            after_terminal = false;
            continue;
        }
        after_terminal = is_terminal(c);
        current.push(c);
    }
    push_trimmed(&mut sentences, &mut current);
    sentences
}

fn push_trimmed(out: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    current.clear();
}

/// Join fragments into running prose, separating them with `". "`.
///
/// A fragment that already ends in terminal punctuation is followed by a
/// single space instead, so joins never produce `".."`.
pub fn join_fragments<S: AsRef<str>>(fragments: &[S]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        let fragment = fragment.as_ref().trim();
        if fragment.is_empty() {
            continue;
        }
        if !out.is_empty() {
            if ends_with_terminal(&out) {
                out.push(' ');
            } else {
                out.push_str(". ");
            }
        }
        out.push_str(fragment);
    }
    out
}

/// Compile a pattern known to be valid at build time.
pub(crate) fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("invalid regex pattern `{pattern}`: {err}"),
    }
}

/// The first `n` characters of `text`.
pub fn take_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// A short single-line preview for log output.
pub fn preview(text: &str, n: usize) -> String {
    if char_len(text) <= n {
        text.to_string()
    } else {
        format!("{}...", take_chars(text, n))
    }
}
