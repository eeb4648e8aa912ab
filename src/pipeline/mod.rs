//! Pipeline stages for paragraph-to-mind-map generation.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different diagram syntax) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ clean ──▶ hierarchy ──▶ mermaid
//! (lopdf)     (LLM)     (LLM+JSON)    (graph TD + HTML)
//! ```
//!
//! 1. [`extract`]   — parse the PDF page, segment it into paragraph
//!    candidates, and select one; runs in `spawn_blocking` because lopdf
//!    parsing is CPU-bound
//! 2. [`clean`]     — one model call to normalise the raw text; degrades to
//!    the raw text on any failure
//! 3. [`hierarchy`] — one model call returning strict topic JSON; degrades
//!    to a sentinel tree on malformed output, fails on transport errors
//! 4. [`mermaid`]   — deterministic conversion of the tree into a Mermaid
//!    `graph TD` block wrapped in a minimal HTML document

pub mod clean;
pub mod extract;
pub mod hierarchy;
pub mod mermaid;
