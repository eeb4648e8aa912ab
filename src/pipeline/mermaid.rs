//! Diagram rendering: topic tree → Mermaid `graph TD` → HTML document.
//!
//! The conversion is purely derived and regenerated on every render; there
//! is no diagram state. Traversal is pre-order and follows the insertion
//! order of each node's children, so the left-to-right layout of the
//! rendered diagram is stable across runs.
//!
//! Label sanitisation replaces `"` with `'` so a label can never terminate
//! the Mermaid string delimiter early. No other escaping is performed;
//! labels containing other Mermaid-reserved tokens are rendered verbatim.
//! The HTML wrapper does no server-side rendering — it loads the Mermaid
//! script from a CDN and lets the browser draw the graph.

use crate::output::TopicNode;

/// CDN URL of the client-side rendering script referenced by the HTML
/// artifact.
pub const MERMAID_CDN: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs";

/// Convert a topic tree into a Mermaid `graph TD` description.
///
/// Each node gets a sequential identifier (`node0`, `node1`, …) assigned in
/// pre-order. The root is declared standalone; every other node is declared
/// through the edge from its parent, with its label attached to the edge's
/// destination.
pub fn to_mermaid(tree: &TopicNode) -> String {
    let mut lines = Vec::new();
    let mut next_id = 0usize;
    walk(tree, None, &mut next_id, &mut lines);
    format!("graph TD\n{}", lines.join("\n"))
}

fn walk(node: &TopicNode, parent: Option<usize>, next_id: &mut usize, lines: &mut Vec<String>) {
    let id = *next_id;
    *next_id += 1;

    let label = sanitize_label(&node.label);
    match parent {
        Some(p) => lines.push(format!("    node{p} --> node{id}[\"{label}\"]")),
        None => lines.push(format!("    node{id}[\"{label}\"]")),
    }

    for child in &node.children {
        walk(child, Some(id), next_id, lines);
    }
}

/// Replace double quotes so labels cannot break the `["…"]` delimiters.
fn sanitize_label(label: &str) -> String {
    label.replace('"', "'")
}

/// Wrap the Mermaid graph in a minimal standalone HTML document.
pub fn render_document(tree: &TopicNode) -> String {
    let graph = to_mermaid(tree);
    format!(
        r#"<!DOCTYPE html>
<html>
<body>
    <h2>Mind Map Visualization</h2>
    <pre class="mermaid">
{graph}
    </pre>
    <script type="module">
        import mermaid from '{MERMAID_CDN}';
        mermaid.initialize({{ startOnLoad: true }});
    </script>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> TopicNode {
        TopicNode {
            label: "Topic".into(),
            children: vec![TopicNode::new("A"), TopicNode::new("B")],
        }
    }

    #[test]
    fn root_with_two_children_declares_three_nodes_two_edges() {
        let graph = to_mermaid(&sample_tree());
        let lines: Vec<&str> = graph.lines().collect();
        assert_eq!(lines[0], "graph TD");
        assert_eq!(lines.len(), 4, "header + 3 declarations");
        assert_eq!(graph.matches(" --> ").count(), 2);
        assert_eq!(lines[1], "    node0[\"Topic\"]");
        assert_eq!(lines[2], "    node0 --> node1[\"A\"]");
        assert_eq!(lines[3], "    node0 --> node2[\"B\"]");
    }

    #[test]
    fn children_appear_in_input_order() {
        let tree = TopicNode {
            label: "r".into(),
            children: vec![
                TopicNode::new("first"),
                TopicNode::new("second"),
                TopicNode::new("third"),
            ],
        };
        let graph = to_mermaid(&tree);
        let first = graph.find("first").unwrap();
        let second = graph.find("second").unwrap();
        let third = graph.find("third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn ids_are_assigned_in_preorder() {
        let tree = TopicNode {
            label: "r".into(),
            children: vec![
                TopicNode {
                    label: "a".into(),
                    children: vec![TopicNode::new("a1")],
                },
                TopicNode::new("b"),
            ],
        };
        let graph = to_mermaid(&tree);
        // r=0, a=1, a1=2, b=3
        assert!(graph.contains("node0 --> node1[\"a\"]"));
        assert!(graph.contains("node1 --> node2[\"a1\"]"));
        assert!(graph.contains("node0 --> node3[\"b\"]"));
    }

    #[test]
    fn double_quotes_become_single_quotes() {
        let tree = TopicNode {
            label: "He said \"hi\"".into(),
            children: vec![],
        };
        let graph = to_mermaid(&tree);
        assert!(graph.contains("node0[\"He said 'hi'\"]"));
        // Every declaration keeps exactly one opening and one closing
        // delimiter, so the string can never be left unterminated.
        for line in graph.lines().skip(1) {
            assert_eq!(line.matches('"').count(), 2, "line: {line}");
        }
    }

    #[test]
    fn single_node_tree_has_no_edges() {
        let graph = to_mermaid(&TopicNode::new("Solo"));
        assert_eq!(graph, "graph TD\n    node0[\"Solo\"]");
    }

    #[test]
    fn document_embeds_graph_and_script() {
        let html = render_document(&sample_tree());
        assert!(html.contains("<pre class=\"mermaid\">"));
        assert!(html.contains("graph TD"));
        assert!(html.contains("Topic"));
        assert!(html.contains("A"));
        assert!(html.contains(MERMAID_CDN));
        assert!(html.contains("mermaid.initialize({ startOnLoad: true });"));
    }
}
