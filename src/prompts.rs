//! System prompts for the two model-backed pipeline stages.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing stage behaviour (e.g. tightening
//!    the JSON-shape instruction) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can import and inspect prompts directly
//!    without a live model, making prompt regressions easy to catch.
//!
//! Callers can override either prompt via
//! [`crate::config::PipelineConfig::clean_system_prompt`] and
//! [`crate::config::PipelineConfig::mindmap_system_prompt`]; the constants
//! here are used only when no override is provided.

/// System prompt for the transcript-cleaning stage.
///
/// The instruction set is deliberately narrow: fix grammar and extraction
/// artifacts, keep everything else. "Do not summarize" is the load-bearing
/// clause — a summarising model would silently drop content.
pub const CLEAN_SYSTEM_PROMPT: &str = "You are a helpful editor. Your task is to clean up the \
following text. Fix grammar, remove formatting artifacts, and ensure it reads smoothly as a \
transcript. Do not summarize; keep the full content.";

/// System prompt for the topic-hierarchy stage.
///
/// Demands a bare JSON object in the dual-key wire shape (`root` at the top
/// level, `name` below). Models still occasionally wrap the object in a
/// markdown fence despite the final sentence, so the hierarchy stage
/// fence-strips the reply before parsing.
pub const MINDMAP_SYSTEM_PROMPT: &str = "You are a helpful assistant. Analyze the provided text \
and extract the main topic and subtopics. Output the result strictly as a valid JSON object with \
this structure: {\"root\": \"Main Topic Title\", \"children\": [{\"name\": \"Subtopic\", \
\"children\": []}]}. Do not add any markdown formatting or explanation. Just the JSON.";
