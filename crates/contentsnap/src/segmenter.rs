//! Paragraph- and sentence-aware segmentation of normalized text.
//!
//! Splits a document into an ordered list of [`Segment`]s sized for the
//! summarization capability. Three tiers are tried in order:
//!
//! 1. **Paragraphs**: blank-line boundaries, when there are enough of them.
//! 2. **Sentences**: grouped into clusters when there are many.
//! 3. **Fixed-width windows**: overlapping character windows, used only
//!    when the first two tiers yield too few sections.
//!
//! Sections are then greedily packed into chunks no larger than the target
//! size, and chunks of 100 characters or fewer are dropped as noise.
//! Segmentation is deterministic: identical input gives identical output.

use tracing::{debug, info};

use crate::text::{char_len, split_sentences, word_count};

/// Smallest target chunk size, in characters.
pub const MIN_CHUNK_SIZE: usize = 600;

/// Chunks at or below this length are discarded.
pub const MIN_SEGMENT_CHARS: usize = 100;

/// Sentences at or below this length are ignored when building sections.
const MIN_SECTION_SENTENCE_CHARS: usize = 20;

/// Text-length breakpoints for the automatic chunk count.
const CHUNK_COUNT_BREAKPOINTS: &[(usize, usize)] = &[(1500, 2), (3000, 4), (6000, 6), (10_000, 8)];

/// Chunk count for text longer than every breakpoint.
const MAX_AUTO_CHUNK_COUNT: usize = 12;

/// Derived sizing for one segmentation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingPlan {
    pub target_chunk_count: usize,
    /// Target chunk size in characters. Never below [`MIN_CHUNK_SIZE`].
    pub target_chunk_size: usize,
    /// Window overlap for the fixed-width tier only.
    pub overlap: usize,
}

impl ChunkingPlan {
    /// Build a plan for text of `text_len` characters.
    ///
    /// `None` (or zero) derives the chunk count from the length breakpoints.
    pub fn for_length(text_len: usize, target_chunk_count: Option<usize>) -> Self {
        let target_chunk_count = target_chunk_count
            .filter(|&n| n > 0)
            .unwrap_or_else(|| auto_chunk_count(text_len));
        let target_chunk_size = MIN_CHUNK_SIZE.max(text_len / target_chunk_count);
        Self {
            target_chunk_count,
            target_chunk_size,
            overlap: target_chunk_size / 6,
        }
    }

    /// Distance between consecutive fixed-width windows.
    pub fn stride(&self) -> usize {
        self.target_chunk_size - self.overlap
    }
}

fn auto_chunk_count(text_len: usize) -> usize {
    CHUNK_COUNT_BREAKPOINTS
        .iter()
        .find(|(limit, _)| text_len < *limit)
        .map_or(MAX_AUTO_CHUNK_COUNT, |(_, count)| *count)
}

/// A contiguous slice of the source text, ready for summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub text: String,
    pub is_last: bool,
}

impl Segment {
    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }

    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }
}

/// Split `text` into ordered segments.
pub fn segment(text: &str, target_chunk_count: Option<usize>) -> Vec<Segment> {
    let plan = ChunkingPlan::for_length(char_len(text), target_chunk_count);
    info!(
        text_length = char_len(text),
        target_chunks = plan.target_chunk_count,
        chunk_size = plan.target_chunk_size,
        "planning segmentation"
    );

    let sections = build_sections(text, &plan);
    let chunks = pack_sections(sections, plan.target_chunk_size);

    let retained: Vec<String> = chunks
        .into_iter()
        .filter(|c| char_len(c) > MIN_SEGMENT_CHARS)
        .collect();
    let total = retained.len();

    let segments: Vec<Segment> = retained
        .into_iter()
        .enumerate()
        .map(|(index, text)| Segment {
            index,
            text,
            is_last: index + 1 == total,
        })
        .collect();

    info!(
        segments = segments.len(),
        sizes = ?segments.iter().map(Segment::char_len).collect::<Vec<_>>(),
        "segmentation finished"
    );
    segments
}

/// Run the paragraph, sentence, and window tiers in order.
fn build_sections(text: &str, plan: &ChunkingPlan) -> Vec<String> {
    let wanted = plan.target_chunk_count / 2;

    let paragraphs: Vec<String> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    let sections = if paragraphs.len() >= wanted {
        debug!(paragraphs = paragraphs.len(), "using paragraph sections");
        paragraphs
    } else {
        sentence_sections(text, plan.target_chunk_count)
    };

    if sections.len() >= wanted {
        return sections;
    }

    debug!(
        sections = sections.len(),
        wanted, "too few sections, falling back to fixed-width windows"
    );
    window_sections(text, plan)
}

fn sentence_sections(text: &str, target_chunk_count: usize) -> Vec<String> {
    let sentences: Vec<String> = split_sentences(text)
        .into_iter()
        .filter(|s| char_len(s) > MIN_SECTION_SENTENCE_CHARS)
        .collect();

    if sentences.len() < target_chunk_count {
        debug!(sentences = sentences.len(), "using raw sentence sections");
        return sentences;
    }

    let per_cluster = 2.max(sentences.len() / target_chunk_count);
    debug!(
        sentences = sentences.len(),
        per_cluster, "grouping sentences into sections"
    );
    sentences
        .chunks(per_cluster)
        .map(|group| group.join(" "))
        .collect()
}

/// Overlapping windows of `target_chunk_size` characters.
fn window_sections(text: &str, plan: &ChunkingPlan) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    (0..chars.len())
        .step_by(plan.stride())
        .filter_map(|start| {
            let end = (start + plan.target_chunk_size).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            let trimmed = window.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

/// Greedily accumulate sections into chunks of at most `target_size`.
///
/// A single section larger than the target becomes its own chunk.
fn pack_sections(sections: Vec<String>, target_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for section in sections {
        let section_len = char_len(&section);
        if current.is_empty() {
            current = section;
            current_len = section_len;
            continue;
        }
        if current_len + 1 + section_len > target_size {
            chunks.push(current.trim().to_string());
            current = section;
            current_len = section_len;
        } else {
            current.push(' ');
            current.push_str(&section);
            current_len += 1 + section_len;
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }
    chunks
}
