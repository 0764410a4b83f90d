//! Abstractive summarization over the OpenRouter chat completions API.
//!
//! The request is async (reqwest), but [`SummarizationCapability::invoke`]
//! is blocking: it drives the request on a Tokio runtime handle captured at
//! construction. Call it from a blocking thread (`spawn_blocking` or a
//! plain thread), never from inside an async task.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::{debug, trace};

use super::{InvokeOptions, SummarizationCapability};
use crate::budget::SummaryBudget;
use crate::text::{char_len, take_chars};

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model for the primary capability.
pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4";

/// Default model for the lighter `simplified` capability.
pub const DEFAULT_LIGHT_MODEL: &str = "google/gemini-2.5-flash";

const SYSTEM_PROMPT: &str = "\
You are a summarization engine. Summarize the text the user sends.

Rules:
- Only state facts present in the text. Do not add commentary or opinions.
- Write plain prose sentences. No headings, lists, or markdown.
- Preserve names, numbers, and the order of events.
- If the text ends with a conclusion or outcome, keep it.
- Output only the summary.";

/// Connection and model settings for [`OpenRouterCapability`].
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub model: String,
    /// Input longer than this (in characters) is cut when the caller asks
    /// for truncation.
    pub max_input_chars: usize,
    pub referer: String,
    pub title: String,
    pub timeout: Duration,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_input_chars: 24_000,
            referer: "https://github.com/contentsnap/contentsnap".to_string(),
            title: "contentsnap".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl OpenRouterConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = max;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize, Debug, Clone, PartialEq)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat completion request body. Unset optional fields are omitted.
#[derive(Serialize, Debug)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repetition_penalty: Option<f32>,
}

#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

#[derive(Deserialize, Debug)]
struct UsageInfo {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

// ── Capability ─────────────────────────────────────────────────────

pub struct OpenRouterCapability {
    name: String,
    config: OpenRouterConfig,
    client: reqwest::Client,
    api_key: String,
    runtime: Handle,
}

impl std::fmt::Debug for OpenRouterCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterCapability")
            .field("name", &self.name)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl OpenRouterCapability {
    /// Create a capability that runs requests on `runtime`.
    pub fn new(
        name: impl Into<String>,
        api_key: impl Into<String>,
        config: OpenRouterConfig,
        runtime: Handle,
    ) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent("contentsnap/0.3")
            .timeout(config.timeout)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            name: name.into(),
            config,
            client,
            api_key: api_key.into(),
            runtime,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request(
        &self,
        text: &str,
        budget: SummaryBudget,
        options: &InvokeOptions,
    ) -> ChatRequest {
        let input = if options.truncate_input && char_len(text) > self.config.max_input_chars {
            debug!(
                capability = %self.name,
                chars = char_len(text),
                limit = self.config.max_input_chars,
                "truncating capability input"
            );
            take_chars(text, self.config.max_input_chars)
        } else {
            text.to_string()
        };

        let system = format!(
            "{SYSTEM_PROMPT}\n- Use between {} and {} tokens.",
            budget.min_tokens, budget.max_tokens
        );

        // Beam width, length penalty and early stopping have no chat API
        // equivalent.
        trace!(
            beam_width = ?options.beam_width,
            length_penalty = ?options.length_penalty,
            early_stopping = options.early_stopping,
            "ignoring decoder-only options"
        );

        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: input,
                },
            ],
            max_tokens: budget.max_tokens,
            temperature: options.deterministic.then_some(0.0),
            seed: options.deterministic.then_some(0),
            repetition_penalty: options.repetition_penalty,
        }
    }

    async fn complete(&self, body: &ChatRequest) -> Result<String, String> {
        debug!(
            "LLM request: model={}, max_tokens={}, input_chars={}",
            body.model,
            body.max_tokens,
            body.messages.last().map_or(0, |m| char_len(&m.content)),
        );

        let start = Instant::now();
        let resp = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("failed to read response: {e}"))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(format!("OpenRouter API HTTP {status}: {text}"));
        }
        parse_completion(&text)
    }
}

/// Extract the summary text from a successful response body.
fn parse_completion(body: &str) -> Result<String, String> {
    let parsed: RawChatResponse =
        serde_json::from_str(body).map_err(|e| format!("failed to parse response: {e}"))?;

    if let Some(err) = parsed.error {
        return Err(format!("OpenRouter API error: {}", err.message));
    }

    if let Some(ref usage) = parsed.usage {
        debug!(
            "Token usage: prompt={}, completion={}",
            usage.prompt_tokens.unwrap_or(0),
            usage.completion_tokens.unwrap_or(0),
        );
    }

    let choice = parsed
        .choices
        .and_then(|c| c.into_iter().next())
        .ok_or_else(|| "OpenRouter API returned no choices".to_string())?;

    if choice.finish_reason.as_deref() == Some("length") {
        debug!("summary hit the max_tokens limit");
    }
    Ok(choice.message.content.unwrap_or_default().trim().to_string())
}

impl SummarizationCapability for OpenRouterCapability {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(
        &self,
        text: &str,
        budget: SummaryBudget,
        options: &InvokeOptions,
    ) -> Result<String, String> {
        let body = self.build_request(text, budget, options);
        self.runtime.block_on(self.complete(&body))
    }
}
