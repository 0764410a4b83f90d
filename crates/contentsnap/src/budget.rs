//! Output-token budgets for whole documents and individual segments.
//!
//! The global stage turns a detail level and document length into a target
//! summary length and a token budget for the short-text path. The
//! per-segment stage sizes each segment's budget from its word count, giving
//! the final segment a more generous allowance so the document's conclusion
//! is less likely to be truncated.

use tracing::debug;

use crate::model::DetailLevel;

/// Gap enforced between `min_tokens` and `max_tokens` when a caller's
/// bounds would otherwise invert them.
pub const MIN_BUDGET_GAP: usize = 50;

/// Upper bound on the computed whole-document `max_tokens`.
const GLOBAL_MAX_TOKENS: usize = 200;
const GLOBAL_MIN_TOKENS: usize = 40;

/// Limits applied to caller-supplied character bounds.
const EXPLICIT_MAX_TOKENS_CAP: usize = 250;
const EXPLICIT_MIN_TOKENS_FLOOR: usize = 30;

/// Minimum/maximum output tokens for one capability invocation.
///
/// Invariant: `min_tokens < max_tokens`. [`SummaryBudget::new`] raises
/// `max_tokens` when that would not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryBudget {
    pub min_tokens: usize,
    pub max_tokens: usize,
}

impl SummaryBudget {
    pub fn new(min_tokens: usize, max_tokens: usize) -> Self {
        let max_tokens = if min_tokens >= max_tokens {
            min_tokens + MIN_BUDGET_GAP
        } else {
            max_tokens
        };
        Self {
            min_tokens,
            max_tokens,
        }
    }
}

/// Length targets for one detail level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailProfile {
    /// Fraction of the source length to aim for.
    pub ratio: f64,
    pub min_chars: usize,
    pub max_chars: usize,
}

impl DetailLevel {
    pub fn profile(&self) -> DetailProfile {
        match self {
            DetailLevel::Low => DetailProfile {
                ratio: 0.20,
                min_chars: 800,
                max_chars: 3000,
            },
            DetailLevel::Medium => DetailProfile {
                ratio: 0.30,
                min_chars: 1500,
                max_chars: 5000,
            },
            DetailLevel::High => DetailProfile {
                ratio: 0.45,
                min_chars: 2500,
                max_chars: 10_000,
            },
        }
    }
}

/// Result of the global planning stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalPlan {
    pub budget: SummaryBudget,
    /// Target summary length in characters.
    pub target_char_length: usize,
}

/// Plan the whole-document summary length.
pub fn plan_global(text_length: usize, detail: DetailLevel) -> GlobalPlan {
    let profile = detail.profile();
    let scaled = (text_length as f64 * profile.ratio) as usize;
    let mut target = scaled.clamp(profile.min_chars, profile.max_chars);

    if text_length > 10_000 {
        target = target.max(4000);
    }
    if text_length > 50_000 {
        target = target.max(8000);
    }

    let max_tokens = GLOBAL_MAX_TOKENS.min(target / 5);
    let min_tokens = GLOBAL_MIN_TOKENS.max(max_tokens / 2);

    debug!(
        text_length,
        detail = %detail,
        target_length = target,
        min_tokens,
        max_tokens,
        "global summary plan"
    );
    GlobalPlan {
        budget: SummaryBudget::new(min_tokens, max_tokens),
        target_char_length: target,
    }
}

/// Replace computed tokens with caller-supplied character bounds.
///
/// Zero bounds are ignored.
pub fn apply_explicit_bounds(
    budget: SummaryBudget,
    max_chars: Option<usize>,
    min_chars: Option<usize>,
) -> SummaryBudget {
    let max_tokens = max_chars
        .filter(|&n| n > 0)
        .map_or(budget.max_tokens, |n| (n / 4).min(EXPLICIT_MAX_TOKENS_CAP));
    let min_tokens = min_chars
        .filter(|&n| n > 0)
        .map_or(budget.min_tokens, |n| (n / 6).max(EXPLICIT_MIN_TOKENS_FLOOR));
    SummaryBudget::new(min_tokens, max_tokens)
}

/// Per-segment budget parameters: `max = clamp(words / divisor, floor, ceil)`,
/// `min = max(max / 2, min_floor)`.
struct SegmentRule {
    divisor: usize,
    floor: usize,
    ceil: usize,
    min_floor: usize,
}

fn segment_rule(detail: DetailLevel, is_last: bool) -> SegmentRule {
    let (divisor, floor, ceil, min_floor) = match (detail, is_last) {
        (DetailLevel::High, true) => (2, 100, 180, 50),
        (DetailLevel::High, false) => (3, 80, 150, 40),
        (DetailLevel::Medium, true) => (3, 80, 150, 40),
        (DetailLevel::Medium, false) => (4, 60, 120, 30),
        (DetailLevel::Low, true) => (4, 60, 120, 30),
        (DetailLevel::Low, false) => (5, 40, 80, 20),
    };
    SegmentRule {
        divisor,
        floor,
        ceil,
        min_floor,
    }
}

/// Budget for one segment of a multi-segment document.
pub fn plan_segment(word_count: usize, is_last: bool, detail: DetailLevel) -> SummaryBudget {
    let rule = segment_rule(detail, is_last);
    let max_tokens = (word_count / rule.divisor).clamp(rule.floor, rule.ceil);
    let min_tokens = (max_tokens / 2).max(rule.min_floor);
    SummaryBudget::new(min_tokens, max_tokens)
}

/// Clamp the global budget to a short document's word count.
pub fn plan_short_path(global: SummaryBudget, word_count: usize) -> SummaryBudget {
    let max_tokens = global.max_tokens.min((word_count / 2).max(50));
    let min_tokens = global.min_tokens.max((max_tokens / 3).min(25));
    SummaryBudget::new(min_tokens, max_tokens)
}

/// Budget for the second-level pass over concatenated segment summaries.
pub fn plan_consolidation(word_count: usize) -> SummaryBudget {
    let max_tokens = (word_count / 3).min(180);
    let min_tokens = (max_tokens / 2).max(80);
    SummaryBudget::new(min_tokens, max_tokens)
}
