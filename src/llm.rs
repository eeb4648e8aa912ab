//! Chat-completion client for OpenAI-compatible endpoints.
//!
//! Both model-backed stages (transcript cleaning and topic extraction) go
//! through the [`ChatProvider`] trait rather than calling HTTP directly.
//! The trait is the test seam: inject a scripted provider via
//! [`crate::config::PipelineConfigBuilder::provider`] and the whole pipeline
//! runs without a network.
//!
//! [`OpenAiClient`] is the production implementation. It speaks the
//! `/chat/completions` wire format, which Ollama, vLLM, LiteLLM, and OpenAI
//! itself all accept, so one client covers every endpoint the tool targets.
//! Each call is a single attempt — a failed completion is either recovered
//! by the calling stage (cleaning) or aborts the run (hierarchy), and the
//! per-call timeout comes from [`crate::config::PipelineConfig`].

use crate::config::PipelineConfig;
use crate::error::MindmapError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// One turn of a chat conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling options for a single completion call.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Sampling temperature. Both stages run low (≈0.2) to bias the model
    /// toward literal edits over creative rewriting.
    pub temperature: f32,
    /// Cap on generated tokens; `None` leaves the endpoint default.
    pub max_tokens: Option<usize>,
    /// Ask the endpoint for its JSON-object response format. Not every
    /// server honours this, so the hierarchy stage still fence-strips the
    /// reply before parsing.
    pub json_mode: bool,
}

/// A completed chat response.
///
/// Token counts are optional because OpenAI-compatible servers differ on
/// whether they report usage; they are logged when present.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub content: String,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
}

/// A chat-completion backend.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send one chat request and return the assistant's reply.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<ChatCompletion, MindmapError>;
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: Option<u64>,
    #[serde(default)]
    completion_tokens: Option<u64>,
}

// ── Production client ────────────────────────────────────────────────────

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Build a client from the pipeline configuration.
    ///
    /// The endpoint settings (`base_url`, `api_key`, `model`) were resolved
    /// once when the config was built; both stages share this client so the
    /// two calls can never silently target different endpoints.
    pub fn new(config: &PipelineConfig) -> Result<Self, MindmapError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| MindmapError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<ChatCompletion, MindmapError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: if options.json_mode {
                Some(ResponseFormat {
                    kind: "json_object",
                })
            } else {
                None
            },
        };

        let url = self.completions_url();
        debug!("POST {} (model={})", url, self.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let detail = if e.is_timeout() {
                    format!("request to {url} timed out")
                } else {
                    format!("request to {url} failed: {e}")
                };
                MindmapError::LlmApi { detail }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(MindmapError::LlmApi {
                detail: format!("HTTP {status}: {}", truncate(&text, 300)),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| MindmapError::LlmApi {
            detail: format!("invalid response body: {e}"),
        })?;

        let (prompt_tokens, completion_tokens) = parsed
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((None, None));

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| MindmapError::LlmApi {
                detail: "response contained no choices".to_string(),
            })?;

        if let (Some(input), Some(output)) = (prompt_tokens, completion_tokens) {
            debug!("completion used {} input / {} output tokens", input, output);
        }

        Ok(ChatCompletion {
            content: choice.message.content,
            prompt_tokens,
            completion_tokens,
        })
    }
}

/// Clip long error bodies so a misbehaving server cannot flood the logs.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let clipped: String = s.chars().take(max_chars).collect();
        format!("{clipped}…")
    }
}
