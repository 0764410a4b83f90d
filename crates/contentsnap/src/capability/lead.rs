//! Offline extractive capability: the leading sentences of the input.

use super::{InvokeOptions, SummarizationCapability};
use crate::budget::SummaryBudget;
use crate::text::{split_sentences, word_count};

/// Returns leading sentences until the next one would push the word count
/// past `max_tokens`. Always emits at least one sentence, cut at word
/// granularity when the first sentence alone is over budget.
///
/// Deterministic and allocation-only, which makes it useful without network
/// access and as a reference capability in tests.
#[derive(Debug, Clone)]
pub struct LeadCapability {
    name: String,
}

impl LeadCapability {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LeadCapability {
    fn default() -> Self {
        Self::new("lead")
    }
}

impl SummarizationCapability for LeadCapability {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(
        &self,
        text: &str,
        budget: SummaryBudget,
        _options: &InvokeOptions,
    ) -> Result<String, String> {
        let sentences = split_sentences(text);
        let Some(first) = sentences.first() else {
            return Err("lead extraction: input has no sentences".to_string());
        };

        if word_count(first) > budget.max_tokens {
            let words: Vec<&str> = first.split_whitespace().take(budget.max_tokens).collect();
            return Ok(words.join(" "));
        }

        let mut picked: Vec<&str> = Vec::new();
        let mut words = 0;
        for sentence in &sentences {
            let n = word_count(sentence);
            if words + n > budget.max_tokens {
                break;
            }
            words += n;
            picked.push(sentence);
        }
        Ok(picked.join(" "))
    }
}
