//! Output types: extraction metadata, the topic tree, and run results.
//!
//! ## The dual-key wire format
//!
//! The model is prompted to return `{"root": "...", "children": [{"name":
//! "...", "children": [...]}]}` — the top-level label lives under `root`
//! while every descendant's label lives under `name`. That is a quirk of the
//! wire format, not a structural distinction, so [`TopicNode`] normalises
//! both into one `label` field at the deserialisation boundary and re-emits
//! the dual-key shape only when writing the JSON artifact. Nothing inside
//! the crate ever branches on "root vs. child key".

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata-bearing result of selecting one paragraph from a PDF page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The selected paragraph text.
    pub text: String,
    /// 1-based page number the paragraph came from.
    pub page: u32,
    /// 0-based index of the paragraph within the page's candidates.
    pub paragraph_index: usize,
    /// Length of `text` in characters.
    pub length: usize,
    /// Wall-clock duration of the parse + segment steps, in seconds.
    pub extraction_time: f64,
}

/// One node of the topic hierarchy.
///
/// A finite tree: `children` are owned, so cycles cannot be constructed.
/// Depth and branching are unbounded in principle but bounded in practice
/// by serde_json's recursion limit during deserialisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicNode {
    pub label: String,
    pub children: Vec<TopicNode>,
}

/// Wire shape of the document root (`root` key).
#[derive(Serialize, Deserialize)]
struct WireRoot {
    root: String,
    #[serde(default)]
    children: Vec<WireNode>,
}

/// Wire shape of every non-root node (`name` key).
#[derive(Serialize, Deserialize)]
struct WireNode {
    name: String,
    #[serde(default)]
    children: Vec<WireNode>,
}

impl From<WireNode> for TopicNode {
    fn from(wire: WireNode) -> Self {
        TopicNode {
            label: wire.name,
            children: wire.children.into_iter().map(TopicNode::from).collect(),
        }
    }
}

fn to_wire_node(node: &TopicNode) -> WireNode {
    WireNode {
        name: node.label.clone(),
        children: node.children.iter().map(to_wire_node).collect(),
    }
}

impl TopicNode {
    /// A leaf node with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// The fixed fallback tree substituted when model output fails to parse.
    pub fn sentinel() -> Self {
        Self {
            label: "Error Parsing JSON".to_string(),
            children: vec![TopicNode::new("Raw Text")],
        }
    }

    /// Parse a tree from the dual-key wire format.
    pub fn from_wire_json(json: &str) -> Result<Self, serde_json::Error> {
        let wire: WireRoot = serde_json::from_str(json)?;
        Ok(Self {
            label: wire.root,
            children: wire.children.into_iter().map(TopicNode::from).collect(),
        })
    }

    /// Serialise the tree back into the dual-key wire format, pretty-printed.
    pub fn to_wire_json(&self) -> Result<String, serde_json::Error> {
        let wire = WireRoot {
            root: self.label.clone(),
            children: self.children.iter().map(to_wire_node).collect(),
        };
        serde_json::to_string_pretty(&wire)
    }

    /// Total number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TopicNode::node_count).sum::<usize>()
    }
}

/// Per-stage timing and size statistics for one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Duration of PDF parse + paragraph selection.
    pub extract_duration_ms: u64,
    /// Duration of the cleaning model call.
    pub clean_duration_ms: u64,
    /// Duration of the hierarchy model call.
    pub mindmap_duration_ms: u64,
    /// Full run duration including artifact writes.
    pub total_duration_ms: u64,
    /// Character count of the raw selected paragraph.
    pub raw_chars: usize,
    /// Character count of the cleaned transcript.
    pub cleaned_chars: usize,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone)]
pub struct MindmapOutput {
    /// Path of the cleaned-transcript artifact (`.txt`).
    pub transcript_path: PathBuf,
    /// Path of the topic-tree artifact (`.json`).
    pub json_path: PathBuf,
    /// Path of the rendered diagram artifact (`.html`).
    pub html_path: PathBuf,
    /// Extraction metadata for the selected paragraph.
    pub extraction: ExtractionResult,
    /// The cleaned transcript text, as persisted.
    pub cleaned_text: String,
    /// The topic tree, as persisted (possibly the sentinel).
    pub tree: TopicNode,
    /// Timing and size statistics.
    pub stats: PipelineStats,
}
