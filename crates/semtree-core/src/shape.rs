use crate::tree::SemanticNode;
use serde::{Deserialize, Serialize};

/// Coarse classification used for label color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeShape {
    /// No children at all.
    Leaf,
    /// Inner node with its own text payload.
    Branch,
    /// Inner node whose text lives in its operator (`content`) nodes.
    ContentOperator,
    Other,
}

impl NodeShape {
    pub fn classify(node: &SemanticNode) -> Self {
        if node.children.is_empty() {
            NodeShape::Leaf
        } else if own_text(node).is_some() {
            NodeShape::Branch
        } else if !node.content.is_empty() {
            NodeShape::ContentOperator
        } else {
            NodeShape::Other
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            NodeShape::Leaf => "red",
            NodeShape::Branch => "blue",
            NodeShape::ContentOperator => "green",
            NodeShape::Other => "magenta",
        }
    }
}

/// Placeholder glyphs for node types that carry no text of their own.
pub fn special_label(kind: &str) -> Option<&'static str> {
    match kind {
        "fraction" => Some("/"),
        "sqrt" | "root" => Some("\u{221A}"),
        "superscript" => Some("\u{25FD}\u{02D9}"),
        "subscript" => Some("\u{25FD}."),
        "subsup" => Some("\u{25FD}:"),
        _ => None,
    }
}

/// An empty `$t` counts as no text.
fn own_text(node: &SemanticNode) -> Option<&str> {
    node.text.as_deref().filter(|t| !t.is_empty())
}

/// The text drawn next to a node marker.
pub fn label(node: &SemanticNode) -> String {
    if let Some(text) = own_text(node) {
        return text.to_string();
    }
    if !node.content.is_empty() {
        return node
            .content
            .iter()
            .filter_map(|c| c.text.as_deref())
            .collect();
    }
    special_label(&node.kind).unwrap_or_default().to_string()
}
