//! Paragraph extraction: parse a PDF page and select one paragraph.
//!
//! ## Why two splitting strategies?
//!
//! Many PDF text extractors collapse paragraph spacing, so blank-line
//! splitting alone is unreliable. Segmentation therefore tries blank-line
//! boundaries first and, when that yields at most one chunk, falls back to
//! treating every non-empty line as its own paragraph — trading precision
//! for availability. No further normalisation is applied: no merging of
//! short lines, no sentence-boundary detection.
//!
//! ## Why spawn_blocking?
//!
//! lopdf parses the whole document synchronously on the calling thread.
//! `tokio::task::spawn_blocking` keeps that CPU-bound work off the async
//! executor's worker threads, matching how the rest of the crate treats
//! blocking work.

use crate::error::MindmapError;
use crate::output::ExtractionResult;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Two or more consecutive newlines mark a paragraph boundary.
static RE_PARA_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Split a page's raw extracted text into paragraph candidates.
///
/// Strategy A splits on blank-line boundaries (runs of two or more
/// newlines). If that yields zero or one chunk, strategy B splits on single
/// newlines and keeps every non-empty trimmed line as its own paragraph.
/// A page with no extractable text yields an empty vec.
pub fn segment_page_text(full_page_text: &str) -> Vec<String> {
    let text = full_page_text.replace("\r\n", "\n").replace('\r', "\n");

    let blocks: Vec<String> = RE_PARA_BREAK
        .split(&text)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(String::from)
        .collect();

    if blocks.len() > 1 {
        return blocks;
    }

    debug!(
        "blank-line split yielded {} chunk(s); falling back to per-line split",
        blocks.len()
    );

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Select one paragraph from one page of a PDF.
///
/// Pages are 1-based, paragraph indices 0-based. Fails with
/// [`MindmapError::FileNotFound`] / [`MindmapError::NotAPdf`] for bad input
/// files, [`MindmapError::PageOutOfRange`] for a bad page number, and
/// [`MindmapError::ParagraphOutOfRange`] (carrying the true paragraph
/// count) for a bad index — including the case where the page yields zero
/// paragraphs and index 0 was requested.
pub async fn select_paragraph(
    pdf_path: impl AsRef<Path>,
    page_number: u32,
    paragraph_index: usize,
) -> Result<ExtractionResult, MindmapError> {
    let path = pdf_path.as_ref().to_path_buf();

    tokio::task::spawn_blocking(move || select_blocking(&path, page_number, paragraph_index))
        .await
        .map_err(|e| MindmapError::Internal(format!("extraction task panicked: {e}")))?
}

/// List every paragraph candidate on a page.
///
/// Used by the CLI's inspection mode so a caller can find the right index
/// before running the full pipeline.
pub async fn list_paragraphs(
    pdf_path: impl AsRef<Path>,
    page_number: u32,
) -> Result<Vec<String>, MindmapError> {
    let path = pdf_path.as_ref().to_path_buf();

    tokio::task::spawn_blocking(move || {
        let doc = load_document(&path)?;
        let full_text = page_text(&doc, &path, page_number)?;
        Ok(segment_page_text(&full_text))
    })
    .await
    .map_err(|e| MindmapError::Internal(format!("extraction task panicked: {e}")))?
}

// ── Blocking implementation ──────────────────────────────────────────────

fn select_blocking(
    path: &Path,
    page_number: u32,
    paragraph_index: usize,
) -> Result<ExtractionResult, MindmapError> {
    let start = Instant::now();

    let doc = load_document(path)?;
    let full_text = page_text(&doc, path, page_number)?;
    let mut segments = segment_page_text(&full_text);

    if paragraph_index >= segments.len() {
        warn!("available paragraphs ({}):", segments.len());
        for (i, p) in segments.iter().take(3).enumerate() {
            let preview: String = p.chars().take(50).collect();
            warn!("  [{i}]: {preview}...");
        }
        return Err(MindmapError::ParagraphOutOfRange {
            index: paragraph_index,
            page: page_number,
            found: segments.len(),
        });
    }

    let text = segments.swap_remove(paragraph_index);
    let length = text.chars().count();
    let extraction_time = start.elapsed().as_secs_f64();

    info!(
        "extracted paragraph {} from page {} of '{}' ({} chars in {:.1}ms)",
        paragraph_index,
        page_number,
        path.display(),
        length,
        extraction_time * 1000.0
    );

    Ok(ExtractionResult {
        text,
        page: page_number,
        paragraph_index,
        length,
        extraction_time,
    })
}

/// Validate the file and parse it with lopdf.
fn load_document(path: &Path) -> Result<lopdf::Document, MindmapError> {
    if !path.exists() {
        return Err(MindmapError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    // Check read permission and the %PDF magic before handing the file to
    // the parser, so callers get a meaningful error rather than a generic
    // parse failure.
    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(MindmapError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(MindmapError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(MindmapError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    lopdf::Document::load(path).map_err(|e| MindmapError::CorruptPdf {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Extract the raw text of one 1-based page, validating the page number.
fn page_text(
    doc: &lopdf::Document,
    path: &Path,
    page_number: u32,
) -> Result<String, MindmapError> {
    let total = doc.get_pages().len();
    debug!("PDF loaded: {} pages", total);

    if page_number == 0 || page_number as usize > total {
        return Err(MindmapError::PageOutOfRange {
            page: page_number,
            total,
        });
    }

    doc.extract_text(&[page_number])
        .map_err(|e| MindmapError::CorruptPdf {
            path: path.to_path_buf(),
            detail: format!("text extraction failed on page {page_number}: {e}"),
        })
}
