use crate::display::{DisplayTree, NodeRef};
use crate::tree::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-node "subtree expanded" flags, keyed by node id.
///
/// The map outlives a single view: a re-render of the same logical tree (e.g. after an
/// orientation change) hands it to the new view, which reapplies it by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityState(BTreeMap<NodeId, bool>);

impl VisibilityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<bool> {
        self.0.get(&id).copied()
    }

    pub fn record(&mut self, id: NodeId, expanded: bool) {
        self.0.insert(id, expanded);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, bool)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Toggles `r` and records the outcome. Leaves are left untouched.
    pub fn toggle(&mut self, tree: &mut DisplayTree, r: NodeRef) -> Option<bool> {
        let expanded = tree.toggle(r)?;
        self.record(tree.node(r).id, expanded);
        tracing::trace!(id = %tree.node(r).id, expanded, "toggled node");
        Some(expanded)
    }

    /// Collapses every expanded node below and including `r`, children first.
    pub fn collapse_subtree(&mut self, tree: &mut DisplayTree, r: NodeRef) {
        for n in tree.collapse_order(r) {
            self.toggle(tree, n);
        }
    }

    /// Records `true` for every node that currently shows its children.
    pub fn mark_expanded(&mut self, tree: &DisplayTree) {
        for (_, node) in tree.iter() {
            if node.is_expanded() {
                self.record(node.id, true);
            }
        }
    }

    /// Reapplies stored flags onto a freshly built tree (all nodes expanded).
    ///
    /// A node stored as expanded stays open and its children are visited; any other node
    /// (stored as collapsed, or unknown) has its whole subtree collapsed.
    pub fn reapply(&mut self, tree: &mut DisplayTree) {
        let mut stack = vec![tree.root()];
        while let Some(r) = stack.pop() {
            let node = tree.node(r);
            if !node.has_children() {
                continue;
            }
            if self.get(node.id) == Some(true) {
                tree.set_expanded(r, true);
                stack.extend(tree.node(r).visible_children().iter().rev().copied());
            } else {
                self.collapse_subtree(tree, r);
            }
        }
    }
}
