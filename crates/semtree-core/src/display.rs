//! The display tree: an owned, index-based copy of a semantic tree with per-node expand/collapse
//! state and layout positions.
//!
//! Every inner node keeps its children in exactly one of two lists: `visible_children` when the
//! node is expanded, `hidden_children` when it is collapsed. Toggling swaps the two lists.

use crate::shape::{self, NodeShape};
use crate::tree::{NodeId, SemanticNode};
use crate::{Error, Result};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(usize);

impl NodeRef {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A point in layout space: `x` runs along the breadth axis, `y` along the depth axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Position, t: f64) -> Position {
        Position {
            x: self.x * (1.0 - t) + to.x * t,
            y: self.y * (1.0 - t) + to.y * t,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplayNode {
    pub id: NodeId,
    pub kind: String,
    pub role: String,
    pub label: String,
    pub shape: NodeShape,
    pub text: Option<String>,
    pub attributes: IndexMap<String, Value>,
    pub parent: Option<NodeRef>,
    pub depth: usize,
    visible_children: Vec<NodeRef>,
    hidden_children: Vec<NodeRef>,
    /// Position computed by the latest layout pass.
    pub position: Position,
    /// Position at the end of the previous layout pass; transitions start here.
    pub previous: Position,
}

impl DisplayNode {
    pub fn visible_children(&self) -> &[NodeRef] {
        &self.visible_children
    }

    pub fn hidden_children(&self) -> &[NodeRef] {
        &self.hidden_children
    }

    /// Children regardless of the collapse state.
    pub fn all_children(&self) -> &[NodeRef] {
        if self.visible_children.is_empty() {
            &self.hidden_children
        } else {
            &self.visible_children
        }
    }

    pub fn has_children(&self) -> bool {
        !self.visible_children.is_empty() || !self.hidden_children.is_empty()
    }

    pub fn is_expanded(&self) -> bool {
        !self.visible_children.is_empty()
    }

    pub fn is_collapsed(&self) -> bool {
        !self.hidden_children.is_empty()
    }

    /// Swaps visible and hidden children.
    ///
    /// Returns the new expanded flag, or `None` for a leaf (which never changes state).
    pub fn toggle(&mut self) -> Option<bool> {
        if !self.has_children() {
            return None;
        }
        std::mem::swap(&mut self.visible_children, &mut self.hidden_children);
        Some(self.is_expanded())
    }

    /// Attribute lookup used by tooltips.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "type" => Some(self.kind.clone()),
            "role" => Some(self.role.clone()),
            "$t" | "text" => self.text.clone(),
            "label" => Some(self.label.clone()),
            other => self.attributes.get(other).map(crate::tree::value_to_text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplayTree {
    nodes: Vec<DisplayNode>,
    by_id: FxHashMap<NodeId, NodeRef>,
}

impl DisplayTree {
    /// Builds an owned copy of `root`; later changes to the source cannot affect this tree.
    ///
    /// All nodes start expanded. Duplicate ids are rejected.
    pub fn from_semantic(root: &SemanticNode) -> Result<Self> {
        let mut tree = Self {
            nodes: Vec::with_capacity(root.count()),
            by_id: FxHashMap::default(),
        };

        let mut stack: Vec<(&SemanticNode, Option<NodeRef>, usize)> = vec![(root, None, 0)];
        while let Some((src, parent, depth)) = stack.pop() {
            let r = NodeRef(tree.nodes.len());
            if tree.by_id.insert(src.id, r).is_some() {
                return Err(Error::InvalidTree {
                    message: format!("duplicate node id {}", src.id),
                });
            }
            tree.nodes.push(DisplayNode {
                id: src.id,
                kind: src.kind.clone(),
                role: src.role.clone(),
                label: shape::label(src),
                shape: NodeShape::classify(src),
                text: src.text.clone(),
                attributes: src.attributes.clone(),
                parent,
                depth,
                visible_children: Vec::with_capacity(src.children.len()),
                hidden_children: Vec::new(),
                position: Position::default(),
                previous: Position::default(),
            });
            if let Some(p) = parent {
                tree.nodes[p.0].visible_children.push(r);
            }
            for child in src.children.iter().rev() {
                stack.push((child, Some(r), depth + 1));
            }
        }

        Ok(tree)
    }

    pub fn root(&self) -> NodeRef {
        NodeRef(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, r: NodeRef) -> &DisplayNode {
        &self.nodes[r.0]
    }

    pub fn node_mut(&mut self, r: NodeRef) -> &mut DisplayNode {
        &mut self.nodes[r.0]
    }

    pub fn find(&self, id: NodeId) -> Option<NodeRef> {
        self.by_id.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeRef, &DisplayNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeRef(i), n))
    }

    /// Toggles one node. See [`DisplayNode::toggle`].
    pub fn toggle(&mut self, r: NodeRef) -> Option<bool> {
        self.nodes[r.0].toggle()
    }

    /// Brings `r` into the requested state. Returns true when something changed.
    pub fn set_expanded(&mut self, r: NodeRef, expanded: bool) -> bool {
        let node = &self.nodes[r.0];
        let needs_flip = if expanded {
            node.is_collapsed()
        } else {
            node.is_expanded()
        };
        needs_flip && self.toggle(r).is_some()
    }

    /// True when every ancestor of `r` is expanded, i.e. the node is drawn.
    pub fn is_on_screen(&self, r: NodeRef) -> bool {
        let mut cur = r;
        while let Some(p) = self.nodes[cur.0].parent {
            if !self.nodes[p.0].is_expanded() {
                return false;
            }
            cur = p;
        }
        true
    }

    /// Nodes reachable through visible children, in pre-order.
    pub fn visible_pre_order(&self) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(r) = stack.pop() {
            out.push(r);
            stack.extend(self.nodes[r.0].visible_children.iter().rev().copied());
        }
        out
    }

    /// The subtree of `r` (visible and hidden parts) in pre-order.
    pub fn subtree_pre_order(&self, r: NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut stack = vec![r];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n.0].all_children().iter().rev().copied());
        }
        out
    }

    /// The subtree of `r` (visible and hidden parts) in post-order.
    pub fn subtree_post_order(&self, r: NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut stack = vec![(r, false)];
        while let Some((n, done)) = stack.pop() {
            if done {
                out.push(n);
                continue;
            }
            stack.push((n, true));
            stack.extend(
                self.nodes[n.0]
                    .all_children()
                    .iter()
                    .rev()
                    .map(|c| (*c, false)),
            );
        }
        out
    }

    /// Nodes to collapse, children before parents, so that a collapsed parent hides an already
    /// collapsed subtree.
    pub fn collapse_order(&self, r: NodeRef) -> Vec<NodeRef> {
        self.subtree_post_order(r)
            .into_iter()
            .filter(|n| self.nodes[n.0].is_expanded())
            .collect()
    }

    /// Nodes to expand, parents before children.
    pub fn expand_order(&self, r: NodeRef) -> Vec<NodeRef> {
        self.subtree_pre_order(r)
            .into_iter()
            .filter(|n| self.nodes[n.0].is_collapsed())
            .collect()
    }

    /// Ids of the nodes currently drawn, in pre-order.
    pub fn visible_ids(&self) -> Vec<NodeId> {
        self.visible_pre_order()
            .into_iter()
            .map(|r| self.nodes[r.0].id)
            .collect()
    }

    /// Copies the current position of `nodes` into their previous position.
    pub fn stash_positions(&mut self, nodes: &[NodeRef]) {
        for r in nodes {
            let n = &mut self.nodes[r.0];
            n.previous = n.position;
        }
    }
}
