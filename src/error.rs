//! Error types for the pdf2mindmap library.
//!
//! One enum covers every fatal failure the pipeline can surface. Two failure
//! classes deliberately never appear here:
//!
//! * A failed *cleaning* call — the cleaner logs the failure and hands the
//!   raw text downstream, so the pipeline keeps going.
//! * A model response that is not valid topic JSON — the hierarchy stage
//!   substitutes a fixed sentinel tree so callers always receive a
//!   well-formed structure.
//!
//! Everything else (missing file, bad page/paragraph index, transport
//! failure on the hierarchy call, artifact write failure) aborts the run
//! and is reported through [`MindmapError`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2mindmap library.
#[derive(Debug, Error)]
pub enum MindmapError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF structure is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// Requested page number exceeds the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: u32, total: usize },

    /// Requested paragraph index exceeds the number of paragraphs found on
    /// the page. The message carries the true count so the caller can retry
    /// with a valid index.
    #[error("Paragraph index {index} is out of range on page {page}: found {found} paragraphs")]
    ParagraphOutOfRange {
        index: usize,
        page: u32,
        found: usize,
    },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The chat-completion endpoint could not be reached or returned a
    /// non-success status.
    #[error("LLM API call failed: {detail}\nCheck LLM_BASE_URL, LLM_API_KEY and LLM_MODEL, and that the endpoint is reachable.")]
    LlmApi { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output artifact.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
