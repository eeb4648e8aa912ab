//! # pdf2mindmap
//!
//! Turn one paragraph of a PDF into a Mermaid mind map.
//!
//! ## What it does
//!
//! The crate extracts a single paragraph from a PDF page, sends it to a
//! language model for grammar cleanup, asks the model for a topic hierarchy
//! of the cleaned text, and renders that hierarchy as a Mermaid diagram
//! embedded in a standalone HTML file. Any OpenAI-compatible
//! chat-completion endpoint works — the default configuration targets a
//! local Ollama instance.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract   parse the page, segment paragraphs, select one (lopdf)
//!  ├─ 2. Clean     model call: fix grammar, keep full content
//!  ├─ 3. Hierarchy model call: strict JSON topic tree (sentinel on bad JSON)
//!  ├─ 4. Render    tree → Mermaid graph TD → HTML
//!  └─ 5. Persist   <base>.txt + <base>.json + <base>.html
//! ```
//!
//! The two model stages fail differently on purpose: a cleaning failure
//! degrades to the raw text (cosmetic stage, availability wins), while a
//! hierarchy transport failure aborts the run (a broken tree cannot stand
//! in for a real one).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2mindmap::{generate, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Endpoint resolved from LLM_BASE_URL / LLM_API_KEY / LLM_MODEL
//!     let config = PipelineConfig::from_env();
//!     let output = generate("paper.pdf", 1, 0, "mindmap.html", &config).await?;
//!     println!("transcript: {}", output.transcript_path.display());
//!     println!("json:       {}", output.json_path.display());
//!     println!("mind map:   {}", output.html_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2mindmap` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2mindmap = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::MindmapError;
pub use generate::{derive_artifact_paths, generate, generate_sync, ArtifactPaths};
pub use llm::{ChatCompletion, ChatMessage, ChatProvider, CompletionOptions, OpenAiClient};
pub use output::{ExtractionResult, MindmapOutput, PipelineStats, TopicNode};
pub use pipeline::extract::{list_paragraphs, segment_page_text, select_paragraph};
pub use pipeline::mermaid::{render_document, to_mermaid};
pub use progress::{
    NoopProgressCallback, PipelineProgressCallback, PipelineStage, ProgressCallback,
};
