//! Topic-hierarchy extraction: one model call returning strict JSON.
//!
//! ## Failure split
//!
//! Unlike the cleaning stage, a transport failure here is fatal: a broken
//! hierarchy cannot safely substitute for raw text, so the error propagates
//! to the caller. A *parse* failure, on the other hand, is recovered — the
//! caller always receives a well-formed tree, at worst the fixed sentinel
//! (`Error Parsing JSON` → `Raw Text`), which renders as a visible error
//! node in the final diagram.
//!
//! JSON response-format mode is requested, but not every server honours it,
//! so the reply is fence-stripped before parsing.

use crate::config::PipelineConfig;
use crate::error::MindmapError;
use crate::llm::{ChatMessage, ChatProvider, CompletionOptions};
use crate::output::TopicNode;
use crate::prompts::MINDMAP_SYSTEM_PROMPT;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

static RE_FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*```(?:json)?\s*").unwrap());
static RE_FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*$").unwrap());

/// Strip markdown code-fence markers the model may wrap around the JSON.
fn strip_code_fences(content: &str) -> String {
    let s = RE_FENCE_OPEN.replace(content, "");
    let s = RE_FENCE_CLOSE.replace(&s, "");
    s.trim().to_string()
}

/// Ask the model for a topic hierarchy of `text`.
///
/// Transport failures propagate as [`MindmapError::LlmApi`]; malformed
/// model output yields [`TopicNode::sentinel`] instead of an error.
pub async fn extract_hierarchy(
    provider: &Arc<dyn ChatProvider>,
    text: &str,
    config: &PipelineConfig,
) -> Result<TopicNode, MindmapError> {
    let start = Instant::now();
    let system = config
        .mindmap_system_prompt
        .as_deref()
        .unwrap_or(MINDMAP_SYSTEM_PROMPT);

    let messages = vec![ChatMessage::system(system), ChatMessage::user(text)];
    let options = CompletionOptions {
        temperature: config.temperature,
        max_tokens: Some(config.max_tokens),
        json_mode: true,
    };

    let completion = provider.chat(&messages, &options).await?;
    let snippet: String = completion.content.chars().take(100).collect();
    info!("raw model output (snippet): {snippet}...");

    let payload = strip_code_fences(&completion.content);
    match TopicNode::from_wire_json(&payload) {
        Ok(tree) => {
            info!(
                "mind map generated: {} nodes in {}ms",
                tree.node_count(),
                start.elapsed().as_millis()
            );
            Ok(tree)
        }
        Err(e) => {
            warn!("failed to parse topic JSON from model: {e}");
            warn!("bad content: {}", payload.chars().take(200).collect::<String>());
            Ok(TopicNode::sentinel())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
                detail: "rate limited".into(),
            })
        }
    }

    #[test]
    fn strips_json_fences() {
        let input = "```json\n{\"root\": \"X\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"root\": \"X\"}");
    }

    #[test]
    fn strips_bare_fences() {
        let input = "```\n{\"root\": \"X\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"root\": \"X\"}");
    }

    #[test]
    fn unfenced_content_passes_through() {
        assert_eq!(strip_code_fences("{\"root\": \"X\"}"), "{\"root\": \"X\"}");
    }

    #[tokio::test]
    async fn valid_json_parses_into_tree() {
        let provider: Arc<dyn ChatProvider> = Arc::new(FixedProvider(
            r#"{"root":"Topic","children":[{"name":"A","children":[]}]}"#,
        ));
        let config = PipelineConfig::default();
        let tree = extract_hierarchy(&provider, "some text", &config)
            .await
            .unwrap();
        assert_eq!(tree.label, "Topic");
        assert_eq!(tree.children[0].label, "A");
    }

    #[tokio::test]
    async fn fenced_json_still_parses() {
        let provider: Arc<dyn ChatProvider> = Arc::new(FixedProvider(
            "```json\n{\"root\":\"Fenced\",\"children\":[]}\n```",
        ));
        let config = PipelineConfig::default();
        let tree = extract_hierarchy(&provider, "text", &config).await.unwrap();
        assert_eq!(tree.label, "Fenced");
    }

    #[tokio::test]
    async fn malformed_json_yields_sentinel() {
        let provider: Arc<dyn ChatProvider> =
            Arc::new(FixedProvider("The main topic is clearly about software."));
        let config = PipelineConfig::default();
        let tree = extract_hierarchy(&provider, "text", &config).await.unwrap();
        assert_eq!(tree, TopicNode::sentinel());
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let provider: Arc<dyn ChatProvider> = Arc::new(FailingProvider);
        let config = PipelineConfig::default();
        let err = extract_hierarchy(&provider, "text", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, MindmapError::LlmApi { .. }));
    }
}
