//! Configuration for a mind-map pipeline run.
//!
//! All behaviour is controlled through [`PipelineConfig`], built via its
//! [`PipelineConfigBuilder`]. Keeping every knob in one struct means the two
//! model-backed stages (cleaning and hierarchy extraction) always see the
//! same endpoint settings — the endpoint is resolved once per run, never
//! per stage.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults
//! for the rest; adding a field never breaks existing call sites.

use crate::error::MindmapError;
use crate::llm::ChatProvider;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Default chat-completion endpoint (a local Ollama instance).
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Default access credential. Ollama ignores the key but the OpenAI wire
/// format requires one to be present.
pub const DEFAULT_API_KEY: &str = "ollama";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama3.1:8b";

/// Configuration for a pipeline run.
///
/// Built via [`PipelineConfig::builder()`], [`PipelineConfig::default()`],
/// or [`PipelineConfig::from_env()`].
///
/// # Example
/// ```rust
/// use pdf2mindmap::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .base_url("http://localhost:11434/v1")
///     .model("llama3.1:8b")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Base URL of the OpenAI-compatible endpoint. Default: [`DEFAULT_BASE_URL`].
    /// Override: `LLM_BASE_URL` (via [`PipelineConfig::from_env`] or the CLI).
    pub base_url: String,

    /// Access credential sent as a bearer token. Default: [`DEFAULT_API_KEY`].
    /// Override: `LLM_API_KEY`.
    pub api_key: String,

    /// Model identifier. Default: [`DEFAULT_MODEL`]. Override: `LLM_MODEL`.
    pub model: String,

    /// Sampling temperature for both model calls. Default: 0.2.
    ///
    /// Low temperature biases the model toward deterministic, literal edits,
    /// which is what both cleanup and topic extraction want. Higher values
    /// invite creative rewriting that defeats the "do not summarize" rule.
    pub temperature: f32,

    /// Maximum tokens the model may generate per call. Default: 4096.
    pub max_tokens: usize,

    /// Per-call HTTP timeout in seconds. Default: 60.
    ///
    /// The pipeline itself never retries; this is the only bound on how long
    /// a run can hang on an unresponsive endpoint.
    pub api_timeout_secs: u64,

    /// Custom system prompt for the cleaning stage. If `None`, uses
    /// [`crate::prompts::CLEAN_SYSTEM_PROMPT`].
    pub clean_system_prompt: Option<String>,

    /// Custom system prompt for the hierarchy stage. If `None`, uses
    /// [`crate::prompts::MINDMAP_SYSTEM_PROMPT`].
    pub mindmap_system_prompt: Option<String>,

    /// Pre-constructed chat provider. Takes precedence over the endpoint
    /// fields above. This is the injection point for tests and for callers
    /// that need custom middleware around the model calls.
    pub provider: Option<Arc<dyn ChatProvider>>,

    /// Progress callback fired at stage boundaries.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 4096,
            api_timeout_secs: 60,
            clean_system_prompt: None,
            mindmap_system_prompt: None,
            provider: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn ChatProvider>"))
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a configuration from the environment.
    ///
    /// Reads `LLM_BASE_URL`, `LLM_API_KEY`, and `LLM_MODEL`, falling back to
    /// the documented defaults when unset or empty. This is the single place
    /// the endpoint settings are resolved — both pipeline stages receive the
    /// result unchanged.
    pub fn from_env() -> Self {
        let env_or = |name: &str, default: &str| -> String {
            match std::env::var(name) {
                Ok(v) if !v.is_empty() => v,
                _ => default.to_string(),
            }
        };

        Self {
            base_url: env_or("LLM_BASE_URL", DEFAULT_BASE_URL),
            api_key: env_or("LLM_API_KEY", DEFAULT_API_KEY),
            model: env_or("LLM_MODEL", DEFAULT_MODEL),
            ..Self::default()
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn clean_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.clean_system_prompt = Some(prompt.into());
        self
    }

    pub fn mindmap_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.mindmap_system_prompt = Some(prompt.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, MindmapError> {
        let c = &self.config;
        if c.base_url.trim().is_empty() {
            return Err(MindmapError::InvalidConfig(
                "base_url must not be empty".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(MindmapError::InvalidConfig(
                "model must not be empty".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(MindmapError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
