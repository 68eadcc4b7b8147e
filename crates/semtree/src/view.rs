//! The tree view controller: one loaded tree, its expand/collapse state and the drawn scene.

use rustc_hash::FxHashMap;
use semtree_core::{
    DisplayTree, NodeId, NodeRef, Orientation, Result, SemanticTree, ViewConfig, VisibilityState,
};
use semtree_render::{
    Canvas, Frame, PassOptions, Scene, SvgRenderOptions, TreeDiagramLayout, layout_pass,
    render_frame_svg,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reapply the view's stored visibility state instead of starting over.
    pub rerun: bool,
}

/// Modifier keys held during an interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interaction {
    /// Slow transitions, for inspecting the animation.
    pub slow: bool,
}

#[derive(Debug, Clone)]
pub struct View {
    config: ViewConfig,
    orientation: Orientation,
    canvas: Canvas,
    states: VisibilityState,
    tree: Option<DisplayTree>,
    scene: Scene,
    layout: Option<TreeDiagramLayout>,
    last_frame: Option<Frame>,
    descriptions: FxHashMap<NodeId, String>,
    interaction: Interaction,
}

/// Creates a view. `states` carries the visibility state of a previous view of the same tree
/// and is only consulted by a rerun load.
pub fn create_view(config: ViewConfig, states: Option<VisibilityState>) -> View {
    View::new(config, states)
}

impl View {
    pub fn new(config: ViewConfig, states: Option<VisibilityState>) -> Self {
        let orientation = config.direction;
        Self {
            canvas: Canvas::new(&config, orientation),
            orientation,
            config,
            states: states.unwrap_or_default(),
            tree: None,
            scene: Scene::default(),
            layout: None,
            last_frame: None,
            descriptions: FxHashMap::default(),
            interaction: Interaction::default(),
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn states(&self) -> &VisibilityState {
        &self.states
    }

    /// Hands the visibility state over, e.g. to the view that replaces this one.
    pub fn into_states(self) -> VisibilityState {
        self.states
    }

    pub fn tree(&self) -> Option<&DisplayTree> {
        self.tree.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Positions from the latest layout pass.
    pub fn current_layout(&self) -> Option<&TreeDiagramLayout> {
        self.layout.as_ref()
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Ids of the nodes currently drawn, in pre-order.
    pub fn visible_ids(&self) -> Vec<NodeId> {
        self.tree
            .as_ref()
            .map(DisplayTree::visible_ids)
            .unwrap_or_default()
    }

    pub fn set_interaction(&mut self, interaction: Interaction) {
        self.interaction = interaction;
    }

    /// Spoken descriptions shown in node tooltips from the next layout pass on.
    pub fn set_descriptions(&mut self, descriptions: FxHashMap<NodeId, String>) {
        self.descriptions = descriptions;
    }

    /// Loads `tree` (a deep copy is taken) and lays it out anchored on the root.
    ///
    /// `None` is absent engine output and leaves the view untouched.
    pub fn load_tree(
        &mut self,
        tree: Option<&SemanticTree>,
        options: LoadOptions,
    ) -> Result<Option<Frame>> {
        let Some(tree) = tree else {
            tracing::debug!("no tree data, nothing to load");
            return Ok(None);
        };

        let mut display_tree = DisplayTree::from_semantic(tree.root())?;
        let root = display_tree.root();
        display_tree.node_mut(root).previous = self.canvas.root_anchor();

        if options.rerun {
            self.states.reapply(&mut display_tree);
        } else if !self.config.expanded {
            self.states.clear();
            self.states.collapse_subtree(&mut display_tree, root);
        } else {
            self.states.clear();
            self.states.mark_expanded(&display_tree);
        }

        tracing::debug!(
            nodes = display_tree.len(),
            rerun = options.rerun,
            expanded = self.config.expanded,
            "loaded tree"
        );

        self.tree = Some(display_tree);
        self.scene = Scene::default();
        self.layout = None;
        Ok(self.pass(root))
    }

    /// Flips one node and lays out anchored on it. Leaves and unknown ids are ignored.
    pub fn toggle_node(&mut self, id: NodeId) -> Option<Frame> {
        let tree = self.tree.as_mut()?;
        let r = tree.find(id)?;
        let on_screen = tree.is_on_screen(r);
        self.states.toggle(tree, r)?;
        if on_screen { self.pass(r) } else { None }
    }

    pub fn expand_all(&mut self) -> Vec<Frame> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        let plan = tree.expand_order(tree.root());
        self.flip_each(plan)
    }

    pub fn collapse_all(&mut self) -> Vec<Frame> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        let plan = tree.collapse_order(tree.root());
        self.flip_each(plan)
    }

    /// Expands `id` and everything below it, parents first.
    pub fn expand_node(&mut self, id: NodeId) -> Vec<Frame> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        let Some(r) = tree.find(id) else {
            return Vec::new();
        };
        let plan = tree.expand_order(r);
        self.flip_each(plan)
    }

    /// Collapses `id` and everything below it, children first.
    pub fn collapse_node(&mut self, id: NodeId) -> Vec<Frame> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        let Some(r) = tree.find(id) else {
            return Vec::new();
        };
        let plan = tree.collapse_order(r);
        self.flip_each(plan)
    }

    /// Switches the axis mapping. Takes effect on the next layout pass.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation == self.orientation {
            return;
        }
        self.orientation = orientation;
        self.config.direction = orientation;
        self.canvas = Canvas::new(&self.config, orientation);
    }

    /// Runs a layout pass anchored on `anchor`.
    pub fn layout(&mut self, anchor: NodeId) -> Option<Frame> {
        let r = self.tree.as_ref()?.find(anchor)?;
        self.pass(r)
    }

    /// Renders the latest frame at progress `t`.
    pub fn render_svg(&self, t: f64, options: &SvgRenderOptions) -> Option<String> {
        self.last_frame
            .as_ref()
            .map(|frame| render_frame_svg(frame, t, options))
    }

    fn flip_each(&mut self, plan: Vec<NodeRef>) -> Vec<Frame> {
        let mut frames = Vec::new();
        for r in plan {
            let Some(tree) = self.tree.as_mut() else {
                break;
            };
            let on_screen = tree.is_on_screen(r);
            if self.states.toggle(tree, r).is_some() && on_screen {
                frames.extend(self.pass(r));
            }
        }
        frames
    }

    fn pass(&mut self, anchor: NodeRef) -> Option<Frame> {
        let tree = self.tree.as_mut()?;
        let options = PassOptions {
            config: &self.config,
            duration: self.config.duration(self.interaction.slow),
            descriptions: (!self.descriptions.is_empty()).then_some(&self.descriptions),
        };
        let (frame, scene, layout) =
            layout_pass(tree, &self.scene, anchor, &self.canvas, &options);
        self.scene = scene;
        self.layout = Some(layout);
        self.last_frame = Some(frame.clone());
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semtree_render::Phase;
    use serde_json::json;

    fn three_nodes() -> SemanticTree {
        SemanticTree::from_value(&json!({"stree": {
            "id": 3, "type": "infixop", "role": "addition",
            "content": [{"id": 2, "type": "operator", "role": "addition", "$t": "+"}],
            "children": [
                {"id": 0, "type": "identifier", "role": "latinletter", "$t": "a"},
                {"id": 1, "type": "identifier", "role": "latinletter", "$t": "b"}
            ]
        }}))
        .unwrap()
        .unwrap()
    }

    #[test]
    fn absent_data_is_a_noop() {
        let mut view = create_view(ViewConfig::default(), None);
        assert!(view.load_tree(None, LoadOptions::default()).unwrap().is_none());
        assert!(view.tree().is_none());
        assert!(view.expand_all().is_empty());
        assert!(view.toggle_node(NodeId(1)).is_none());
    }

    #[test]
    fn slow_interaction_stretches_the_transition() {
        let mut view = create_view(ViewConfig::default(), None);
        let frame = view
            .load_tree(Some(&three_nodes()), LoadOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(frame.duration_ms, 500);

        view.set_interaction(Interaction { slow: true });
        let frame = view.toggle_node(NodeId(3)).unwrap();
        assert_eq!(frame.duration_ms, 5000);
        assert!(frame.nodes.iter().any(|n| n.phase == Phase::Enter));
    }

    #[test]
    fn toggling_a_hidden_node_only_updates_state() {
        let tree = SemanticTree::from_value(&json!({"stree": {
            "id": 1, "children": [{"id": 2, "children": [{"id": 3}]}]
        }}))
        .unwrap();
        let mut view = create_view(ViewConfig::default(), None);
        view.load_tree(tree.as_ref(), LoadOptions::default()).unwrap();
        assert_eq!(view.states().get(NodeId(2)), Some(false));

        assert!(view.toggle_node(NodeId(2)).is_none());
        assert_eq!(view.states().get(NodeId(2)), Some(true));
        assert_eq!(view.visible_ids(), vec![NodeId(1)]);

        view.toggle_node(NodeId(1)).unwrap();
        assert_eq!(view.visible_ids(), vec![NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn orientation_change_waits_for_the_next_pass() {
        let mut view = create_view(ViewConfig::default(), None);
        view.load_tree(Some(&three_nodes()), LoadOptions::default())
            .unwrap();
        let before = view.last_frame().cloned();
        view.set_orientation(Orientation::LeftToRight);
        assert_eq!(view.orientation(), Orientation::LeftToRight);
        assert_eq!(view.canvas().width, 1040.0);
        assert_eq!(view.last_frame().cloned(), before);

        let frame = view.layout(NodeId(3)).unwrap();
        assert_eq!(frame.canvas.orientation, Orientation::LeftToRight);
    }
}
