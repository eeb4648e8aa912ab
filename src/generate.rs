//! Pipeline orchestration: extract → clean → hierarchy → render → persist.
//!
//! The stages run strictly in sequence — one paragraph per invocation, no
//! concurrency between stages. Each run is isolated and, given identical
//! inputs and a deterministic model, idempotent. The three artifact writes
//! are not transactional: a crash mid-write can leave a partial set on
//! disk, which is an accepted limitation.

use crate::config::PipelineConfig;
use crate::error::MindmapError;
use crate::llm::{ChatProvider, OpenAiClient};
use crate::output::{MindmapOutput, PipelineStats};
use crate::pipeline::{clean, extract, hierarchy, mermaid};
use crate::progress::PipelineStage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// The three artifact paths derived from one output base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub transcript: PathBuf,
    pub json: PathBuf,
    pub html: PathBuf,
}

/// Derive the artifact paths from the output base name.
///
/// A trailing `.html` is treated as the extension of the HTML artifact and
/// stripped to obtain the shared stem. A base name without that suffix is
/// used as the stem directly and the extensions are *appended* — never
/// substituted into the middle of the name — so `report.v2` becomes
/// `report.v2.html`, not a collision with some other file.
pub fn derive_artifact_paths(output_base: &str) -> ArtifactPaths {
    let stem = output_base.strip_suffix(".html").unwrap_or(output_base);
    ArtifactPaths {
        transcript: PathBuf::from(format!("{stem}.txt")),
        json: PathBuf::from(format!("{stem}.json")),
        html: PathBuf::from(format!("{stem}.html")),
    }
}

/// Run the full pipeline for one paragraph and persist the three artifacts.
///
/// # Arguments
/// * `pdf_path`        — local PDF file
/// * `page`            — 1-based page number
/// * `paragraph_index` — 0-based paragraph index within the page
/// * `output_base`     — base name the `.txt` / `.json` / `.html` artifact
///   paths are derived from
/// * `config`          — pipeline configuration
///
/// # Errors
/// Any stage failure aborts the run: extraction errors, a transport failure
/// on the hierarchy call, or an artifact write failure. A failed *cleaning*
/// call and malformed hierarchy JSON are recovered internally (raw text and
/// sentinel tree respectively) and do not surface here.
pub async fn generate(
    pdf_path: impl AsRef<Path>,
    page: u32,
    paragraph_index: usize,
    output_base: impl AsRef<str>,
    config: &PipelineConfig,
) -> Result<MindmapOutput, MindmapError> {
    let total_start = Instant::now();
    let pdf_path = pdf_path.as_ref();
    info!("starting pipeline: {} p{page}#{paragraph_index}", pdf_path.display());

    let provider = resolve_provider(config)?;

    // ── Stage 1: Extract ─────────────────────────────────────────────────
    let stage_start = stage_begin(config, PipelineStage::Extract);
    let extraction = extract::select_paragraph(pdf_path, page, paragraph_index).await?;
    let extract_duration_ms = stage_end(config, PipelineStage::Extract, stage_start);

    // ── Stage 2: Clean ───────────────────────────────────────────────────
    let stage_start = stage_begin(config, PipelineStage::Clean);
    let cleaned_text = clean::clean_text(&provider, &extraction.text, config).await;
    let clean_duration_ms = stage_end(config, PipelineStage::Clean, stage_start);

    // ── Stage 3: Hierarchy ───────────────────────────────────────────────
    let stage_start = stage_begin(config, PipelineStage::Mindmap);
    let tree = hierarchy::extract_hierarchy(&provider, &cleaned_text, config).await?;
    let mindmap_duration_ms = stage_end(config, PipelineStage::Mindmap, stage_start);

    // ── Stage 4: Render + persist ────────────────────────────────────────
    let stage_start = stage_begin(config, PipelineStage::Render);
    let html = mermaid::render_document(&tree);
    let json = tree
        .to_wire_json()
        .map_err(|e| MindmapError::Internal(format!("failed to serialise topic tree: {e}")))?;

    let paths = derive_artifact_paths(output_base.as_ref());
    write_artifact(&paths.transcript, &cleaned_text).await?;
    write_artifact(&paths.json, &json).await?;
    write_artifact(&paths.html, &html).await?;
    stage_end(config, PipelineStage::Render, stage_start);

    let stats = PipelineStats {
        extract_duration_ms,
        clean_duration_ms,
        mindmap_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        raw_chars: extraction.length,
        cleaned_chars: cleaned_text.chars().count(),
    };

    info!(
        "pipeline complete in {}ms: {} / {} / {}",
        stats.total_duration_ms,
        paths.transcript.display(),
        paths.json.display(),
        paths.html.display()
    );

    Ok(MindmapOutput {
        transcript_path: paths.transcript,
        json_path: paths.json,
        html_path: paths.html,
        extraction,
        cleaned_text,
        tree,
        stats,
    })
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    pdf_path: impl AsRef<Path>,
    page: u32,
    paragraph_index: usize,
    output_base: impl AsRef<str>,
    config: &PipelineConfig,
) -> Result<MindmapOutput, MindmapError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| MindmapError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(generate(pdf_path, page, paragraph_index, output_base, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the chat provider: an injected one wins, otherwise build the
/// HTTP client from the endpoint settings.
fn resolve_provider(config: &PipelineConfig) -> Result<Arc<dyn ChatProvider>, MindmapError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }
    Ok(Arc::new(OpenAiClient::new(config)?))
}

fn stage_begin(config: &PipelineConfig, stage: PipelineStage) -> Instant {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage);
    }
    Instant::now()
}

fn stage_end(config: &PipelineConfig, stage: PipelineStage, start: Instant) -> u64 {
    let duration_ms = start.elapsed().as_millis() as u64;
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(stage, duration_ms);
    }
    duration_ms
}

async fn write_artifact(path: &Path, contents: &str) -> Result<(), MindmapError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MindmapError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    tokio::fs::write(path, contents)
        .await
        .map_err(|e| MindmapError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_suffix_is_stripped_to_the_stem() {
        let paths = derive_artifact_paths("out.html");
        assert_eq!(paths.transcript, PathBuf::from("out.txt"));
        assert_eq!(paths.json, PathBuf::from("out.json"));
        assert_eq!(paths.html, PathBuf::from("out.html"));
    }

    #[test]
    fn extensions_are_appended_without_html_suffix() {
        let paths = derive_artifact_paths("out");
        assert_eq!(paths.transcript, PathBuf::from("out.txt"));
        assert_eq!(paths.json, PathBuf::from("out.json"));
        assert_eq!(paths.html, PathBuf::from("out.html"));
    }

    #[test]
    fn dotted_base_names_do_not_lose_their_middle() {
        let paths = derive_artifact_paths("report.v2");
        assert_eq!(paths.transcript, PathBuf::from("report.v2.txt"));
        assert_eq!(paths.json, PathBuf::from("report.v2.json"));
        assert_eq!(paths.html, PathBuf::from("report.v2.html"));
    }

    #[test]
    fn directories_in_the_base_are_preserved() {
        let paths = derive_artifact_paths("out/dir/mindmap.html");
        assert_eq!(paths.transcript, PathBuf::from("out/dir/mindmap.txt"));
        assert_eq!(paths.html, PathBuf::from("out/dir/mindmap.html"));
    }
}
