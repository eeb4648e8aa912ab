//! Transcript cleaning: one model call to normalise the raw paragraph.
//!
//! This stage is cosmetic, so it trades fidelity for availability: any
//! failure from the provider — transport error, bad status, empty reply —
//! is logged and the raw text is returned unchanged. A cleaning failure
//! must never abort the pipeline; downstream stages always receive usable
//! input.

use crate::config::PipelineConfig;
use crate::llm::{ChatMessage, ChatProvider, CompletionOptions};
use crate::prompts::CLEAN_SYSTEM_PROMPT;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Clean the raw paragraph text via the model.
///
/// Returns the cleaned text, or `raw_text` unchanged (byte-for-byte) when
/// the call fails in any way.
pub async fn clean_text(
    provider: &Arc<dyn ChatProvider>,
    raw_text: &str,
    config: &PipelineConfig,
) -> String {
    let start = Instant::now();
    let system = config
        .clean_system_prompt
        .as_deref()
        .unwrap_or(CLEAN_SYSTEM_PROMPT);

    let messages = vec![ChatMessage::system(system), ChatMessage::user(raw_text)];
    let options = CompletionOptions {
        temperature: config.temperature,
        max_tokens: Some(config.max_tokens),
        json_mode: false,
    };

    // Rough token estimate (~4 chars per token) for throughput logging.
    debug!(
        "cleaning {} chars (~{} tokens)",
        raw_text.chars().count(),
        raw_text.len() / 4
    );

    match provider.chat(&messages, &options).await {
        Ok(completion) if !completion.content.trim().is_empty() => {
            info!(
                "transcript cleaned: {} chars in {}ms",
                completion.content.chars().count(),
                start.elapsed().as_millis()
            );
            completion.content
        }
        Ok(_) => {
            warn!("cleaning call returned empty content, keeping raw text");
            raw_text.to_string()
        }
        Err(e) => {
            warn!("cleaning call failed, keeping raw text: {e}");
            raw_text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MindmapError;
    use crate::llm::ChatCompletion;
    use async_trait::async_trait;

    struct FixedProvider(&'static str);

    #[async_trait]
    impl ChatProvider for FixedProvider {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _options: &CompletionOptions,
        ) -> Result<ChatCompletion, MindmapError> {
            Ok(ChatCompletion {
                content: self.0.to_string(),
                prompt_tokens: None,
                completion_tokens: None,
            })
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _options: &CompletionOptions,
        ) -> Result<ChatCompletion, MindmapError> {
            Err(MindmapError::LlmApi {
                detail: "connection refused".into(),
            })
        }
    }

    #[test]
    fn successful_call_returns_model_content() {
        let provider: Arc<dyn ChatProvider> = Arc::new(FixedProvider("Cleaned text."));
        let config = PipelineConfig::default();
        let cleaned = tokio_test::block_on(clean_text(&provider, "raw  text", &config));
        assert_eq!(cleaned, "Cleaned text.");
    }

    #[test]
    fn failing_call_returns_input_unchanged() {
        let provider: Arc<dyn ChatProvider> = Arc::new(FailingProvider);
        let config = PipelineConfig::default();
        let raw = "Raw paragraph with  odd   spacing.\u{00AD}";
        let cleaned = tokio_test::block_on(clean_text(&provider, raw, &config));
        assert_eq!(cleaned, raw, "must be byte-for-byte identical");
    }

    #[test]
    fn empty_reply_falls_back_to_input() {
        let provider: Arc<dyn ChatProvider> = Arc::new(FixedProvider("   \n"));
        let config = PipelineConfig::default();
        let cleaned = tokio_test::block_on(clean_text(&provider, "keep me", &config));
        assert_eq!(cleaned, "keep me");
    }
}
