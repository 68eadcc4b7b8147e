use crate::canvas::Canvas;
use crate::frame::{Frame, LinkTransition, NodeTransition, NodeVisual, Phase};
use crate::layout::layout_visible;
use crate::model::TreeDiagramLayout;
use crate::reconcile::reconcile;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use semtree_core::{DisplayNode, DisplayTree, NodeId, NodeRef, Position, ViewConfig};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnNode {
    pub position: Position,
    pub visual: NodeVisual,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnLink {
    pub source: NodeId,
    pub from: Position,
    pub to: Position,
}

/// What is on screen after the latest pass: nodes keyed by id, links keyed by target id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub nodes: IndexMap<NodeId, DrawnNode>,
    pub links: IndexMap<NodeId, DrawnLink>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }
}

pub struct PassOptions<'a> {
    pub config: &'a ViewConfig,
    pub duration: Duration,
    /// Spoken descriptions appended to tooltips, when the engine provides them.
    pub descriptions: Option<&'a FxHashMap<NodeId, String>>,
}

impl<'a> PassOptions<'a> {
    pub fn new(config: &'a ViewConfig) -> Self {
        Self {
            config,
            duration: config.duration(false),
            descriptions: None,
        }
    }
}

fn tooltip(node: &DisplayNode, opts: &PassOptions<'_>) -> String {
    let mut out = opts
        .config
        .tooltip_fields
        .iter()
        .map(|f| node.attribute(f).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(": ");
    if let Some(desc) = opts.descriptions.and_then(|d| d.get(&node.id)) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(desc);
    }
    out
}

pub fn node_visual(node: &DisplayNode, opts: &PassOptions<'_>) -> NodeVisual {
    NodeVisual {
        label: node.label.clone(),
        color: node.shape.color(),
        marker_fill: if node.is_collapsed() {
            "lightsteelblue"
        } else {
            "#fff"
        },
        has_children: node.has_children(),
        tooltip: tooltip(node, opts),
    }
}

/// Runs one layout pass anchored on `anchor`.
///
/// Positions are written into `tree`, the transition from `scene` to the new drawn state is
/// returned as a [`Frame`], and every visible node's position is copied into its previous
/// position. The returned [`Scene`] replaces `scene` for the next pass.
pub fn layout_pass(
    tree: &mut DisplayTree,
    scene: &Scene,
    anchor: NodeRef,
    canvas: &Canvas,
    opts: &PassOptions<'_>,
) -> (Frame, Scene, TreeDiagramLayout) {
    let anchor_from = tree.node(anchor).previous;
    let layout = layout_visible(tree, canvas);
    let anchor_to = tree.node(anchor).position;

    let diff = reconcile(&scene.node_ids(), &layout.ids());
    let mut next = Scene::default();
    let mut nodes = Vec::with_capacity(layout.nodes.len() + diff.exiting.len());

    for placed in &layout.nodes {
        let Some(r) = tree.find(placed.id) else {
            continue;
        };
        let node = tree.node(r);
        let (phase, from) = match scene.nodes.get(&node.id) {
            Some(drawn) => (Phase::Update, drawn.position),
            None => (Phase::Enter, anchor_from),
        };
        let visual = node_visual(node, opts);
        next.nodes.insert(
            node.id,
            DrawnNode {
                position: node.position,
                visual: visual.clone(),
            },
        );
        nodes.push(NodeTransition {
            id: node.id,
            phase,
            from,
            to: node.position,
            visual,
        });
    }
    for id in &diff.exiting {
        if let Some(drawn) = scene.nodes.get(id) {
            nodes.push(NodeTransition {
                id: *id,
                phase: Phase::Exit,
                from: drawn.position,
                to: anchor_to,
                visual: drawn.visual.clone(),
            });
        }
    }

    let mut links = Vec::with_capacity(layout.links.len());
    for link in &layout.links {
        let (Some(s), Some(t)) = (tree.find(link.source), tree.find(link.target)) else {
            continue;
        };
        let to = (tree.node(s).position, tree.node(t).position);
        let (phase, from) = match scene.links.get(&link.target) {
            Some(drawn) => (Phase::Update, (drawn.from, drawn.to)),
            None => (Phase::Enter, (anchor_from, anchor_from)),
        };
        next.links.insert(
            link.target,
            DrawnLink {
                source: link.source,
                from: to.0,
                to: to.1,
            },
        );
        links.push(LinkTransition {
            source: link.source,
            target: link.target,
            phase,
            from,
            to,
        });
    }
    for (target, drawn) in &scene.links {
        if !next.links.contains_key(target) {
            links.push(LinkTransition {
                source: drawn.source,
                target: *target,
                phase: Phase::Exit,
                from: (drawn.from, drawn.to),
                to: (anchor_to, anchor_to),
            });
        }
    }

    let visible = tree.visible_pre_order();
    tree.stash_positions(&visible);

    tracing::debug!(
        anchor = %tree.node(anchor).id,
        entering = diff.entering.len(),
        updating = diff.updating.len(),
        exiting = diff.exiting.len(),
        "layout pass"
    );

    let frame = Frame {
        anchor: tree.node(anchor).id,
        anchor_from,
        anchor_to,
        duration_ms: u64::try_from(opts.duration.as_millis()).unwrap_or(u64::MAX),
        canvas: *canvas,
        marker_radius: opts.config.marker_radius,
        font_size: opts.config.font_size,
        nodes,
        links,
    };
    (frame, next, layout)
}
