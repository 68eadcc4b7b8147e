use crate::canvas::Canvas;
use crate::model::{LayoutLink, LayoutNode, TreeDiagramLayout};
use numbat::{Hierarchy, NodeIndex, Sizing, TreeLayout};
use semtree_core::{DisplayTree, Position};

/// Lays out the visible part of `tree` on `canvas` and writes the result into each node's
/// `position`. Hidden nodes keep their old positions.
pub fn layout_visible(tree: &mut DisplayTree, canvas: &Canvas) -> TreeDiagramLayout {
    let visible = tree.visible_pre_order();

    // Parents precede children in pre-order, so every parent index exists when a child is added.
    let mut hierarchy = Hierarchy::new();
    let mut index: Vec<Option<NodeIndex>> = vec![None; tree.len()];
    for &r in &visible {
        let idx = match tree.node(r).parent.and_then(|p| index[p.index()]) {
            Some(parent) => hierarchy.add_child(parent),
            None => hierarchy.root(),
        };
        index[r.index()] = Some(idx);
    }

    let (breadth, depth) = canvas.layout_extent();
    let points = numbat::layout(
        &hierarchy,
        &TreeLayout {
            sizing: Sizing::Fit {
                width: breadth,
                height: depth,
            },
            ..TreeLayout::default()
        },
    );

    let mut nodes = Vec::with_capacity(visible.len());
    let mut links = Vec::with_capacity(visible.len().saturating_sub(1));
    for &r in &visible {
        let Some(idx) = index[r.index()] else {
            continue;
        };
        let p = points[idx.index()];
        let node = tree.node_mut(r);
        node.position = Position::new(p.x, p.y);
        nodes.push(LayoutNode {
            id: node.id,
            x: p.x,
            y: p.y,
            depth: node.depth,
            label: node.label.clone(),
            collapsed: node.is_collapsed(),
        });
        if let Some(parent) = node.parent {
            let target = node.id;
            links.push(LayoutLink {
                source: tree.node(parent).id,
                target,
            });
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        orientation = %canvas.orientation,
        "laid out visible tree"
    );

    TreeDiagramLayout {
        orientation: canvas.orientation,
        width: canvas.width,
        height: canvas.height,
        nodes,
        links,
    }
}
