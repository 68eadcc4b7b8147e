use semtree_core::{NodeId, Orientation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: NodeId,
    /// Breadth-axis coordinate.
    pub x: f64,
    /// Depth-axis coordinate.
    pub y: f64,
    pub depth: usize,
    pub label: String,
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutLink {
    pub source: NodeId,
    pub target: NodeId,
}

/// Positions of every visible node, in pre-order, plus the parent/child links between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDiagramLayout {
    pub orientation: Orientation,
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<LayoutNode>,
    pub links: Vec<LayoutLink>,
}

impl TreeDiagramLayout {
    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }
}
