//! Coverage recovery for the document's ending.

use tracing::info;

use crate::segmenter::Segment;
use crate::summarizer::SegmentOutcome;
use crate::text::split_sentences;

/// Prefix marking recovered ending text.
pub const ENDING_TAG: &str = "[ENDING]";

/// Sentences re-extracted from the last segment.
const RECOVERED_SENTENCES: usize = 3;

/// Append the final sentences of the last segment when any segment of a
/// multi-segment document failed.
///
/// The append happens even if the last segment itself succeeded. Returns
/// `true` if an outcome was added.
pub fn recover_ending(segments: &[Segment], outcomes: &mut Vec<SegmentOutcome>) -> bool {
    let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
    if segments.len() <= 1 || accepted >= segments.len() {
        return false;
    }
    let Some(last) = segments.last() else {
        return false;
    };

    let sentences = split_sentences(&last.text);
    if sentences.len() < 2 {
        return false;
    }
    let start = sentences.len().saturating_sub(RECOVERED_SENTENCES);
    let ending = sentences[start..].join(" ");

    info!(
        accepted,
        segments = segments.len(),
        sentences = sentences.len() - start,
        "recovering document ending"
    );
    outcomes.push(SegmentOutcome::Recovered(format!("{ENDING_TAG} {ending}")));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(texts: &[&str]) -> Vec<Segment> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| Segment {
                index,
                text: text.to_string(),
                is_last: index + 1 == texts.len(),
            })
            .collect()
    }

    const FIRST: &str = "The opening segment sets the scene. It introduces everyone.";
    const LAST: &str = "Things happen. More things happen. The hero wins. Everyone goes home.";

    #[test]
    fn appends_tagged_ending_when_a_segment_failed() {
        let segs = segments(&[FIRST, LAST]);
        let mut outcomes = vec![
            SegmentOutcome::Generated("Summary of the opening.".into()),
            SegmentOutcome::Failed,
        ];
        assert!(recover_ending(&segs, &mut outcomes));
        assert_eq!(
            outcomes.last(),
            Some(&SegmentOutcome::Recovered(
                "[ENDING] More things happen. The hero wins. Everyone goes home.".into()
            ))
        );
    }

    #[test]
    fn appends_even_if_last_segment_succeeded() {
        let segs = segments(&[FIRST, "A middle part goes here. And continues on.", LAST]);
        let mut outcomes = vec![
            SegmentOutcome::Failed,
            SegmentOutcome::Generated("Middle.".into()),
            SegmentOutcome::Generated("Ending summary.".into()),
        ];
        assert!(recover_ending(&segs, &mut outcomes));
        assert_eq!(outcomes.len(), 4);
    }

    #[test]
    fn nothing_to_do_when_all_segments_succeeded() {
        let segs = segments(&[FIRST, LAST]);
        let mut outcomes = vec![
            SegmentOutcome::Generated("One.".into()),
            SegmentOutcome::Generated("Two.".into()),
        ];
        assert!(!recover_ending(&segs, &mut outcomes));
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn single_segment_documents_are_skipped() {
        let segs = segments(&[LAST]);
        let mut outcomes = vec![SegmentOutcome::Failed];
        assert!(!recover_ending(&segs, &mut outcomes));
    }

    #[test]
    fn single_sentence_ending_is_not_recovered() {
        let segs = segments(&[FIRST, "Only one sentence remains here"]);
        let mut outcomes = vec![SegmentOutcome::Failed, SegmentOutcome::Failed];
        assert!(!recover_ending(&segs, &mut outcomes));
    }
}
