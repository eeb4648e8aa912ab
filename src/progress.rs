//! Progress-callback trait for per-stage pipeline events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to receive
//! events as the pipeline enters and leaves each stage.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a terminal spinner, a log record, or a UI without
//! the library knowing anything about how the host application communicates.

use std::fmt;
use std::sync::Arc;

/// The four observable stages of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Parse the PDF and select the requested paragraph.
    Extract,
    /// Clean the paragraph text via the model.
    Clean,
    /// Ask the model for the topic hierarchy.
    Mindmap,
    /// Render the diagram and persist the artifacts.
    Render,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Extract => "extract",
            PipelineStage::Clean => "clean",
            PipelineStage::Mindmap => "mindmap",
            PipelineStage::Render => "render",
        };
        f.write_str(name)
    }
}

/// Called by the pipeline as it moves through its stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The pipeline is strictly sequential, so events for
/// one run never interleave.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called just before a stage begins.
    fn on_stage_start(&self, stage: PipelineStage) {
        let _ = stage;
    }

    /// Called when a stage finishes, with its wall-clock duration.
    fn on_stage_complete(&self, stage: PipelineStage, duration_ms: u64) {
        let _ = (stage, duration_ms);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;
