//! A page session: the input box, the text panels and the single live tree view.

use crate::view::{LoadOptions, View, create_view};
use rustc_hash::FxHashMap;
use semtree_core::{
    InputFormat, NodeId, Orientation, Panel, PanelFlags, ReadyPolicy, Result, SemanticEngine,
    SemanticNode, SemanticTree, ShareLink, ViewConfig, wait_until_ready,
};
use semtree_render::Frame;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelTexts {
    texts: [Option<String>; 4],
}

impl PanelTexts {
    pub fn get(&self, panel: Panel) -> Option<&str> {
        self.texts[Self::slot(panel)].as_deref()
    }

    fn set(&mut self, panel: Panel, text: Option<String>) {
        self.texts[Self::slot(panel)] = text;
    }

    fn slot(panel: Panel) -> usize {
        Panel::ALL.iter().position(|p| *p == panel).unwrap_or(0)
    }
}

/// Converted form of the current input, kept until a later conversion succeeds.
#[derive(Debug, Clone)]
struct Converted {
    input: String,
    markup: Option<String>,
    tree: Option<SemanticTree>,
}

pub struct Workbench<E> {
    engine: E,
    config: ViewConfig,
    ready: ReadyPolicy,
    panels: PanelFlags,
    current: Option<Converted>,
    texts: PanelTexts,
    view: Option<View>,
}

impl<E: SemanticEngine> Workbench<E> {
    pub fn new(engine: E, config: ViewConfig) -> Self {
        Self {
            engine,
            config,
            ready: ReadyPolicy::default(),
            panels: PanelFlags::default(),
            current: None,
            texts: PanelTexts::default(),
            view: None,
        }
    }

    pub fn with_ready_policy(mut self, ready: ReadyPolicy) -> Self {
        self.ready = ready;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut View> {
        self.view.as_mut()
    }

    pub fn tree(&self) -> Option<&SemanticTree> {
        self.current.as_ref().and_then(|c| c.tree.as_ref())
    }

    pub fn input(&self) -> &str {
        self.current.as_ref().map_or("", |c| c.input.as_str())
    }

    pub fn panels(&self) -> PanelFlags {
        self.panels
    }

    /// Text of a panel, if the panel is shown and there is something to show.
    pub fn panel_text(&self, panel: Panel) -> Option<&str> {
        if !self.panels.is_shown(panel) {
            return None;
        }
        self.texts.get(panel)
    }

    /// Shows or hides a panel; a newly shown panel is filled from the current input.
    pub fn set_panel(&mut self, panel: Panel, shown: bool) -> Result<()> {
        self.panels.set(panel, shown);
        if !shown {
            self.texts.set(panel, None);
            return Ok(());
        }
        let Some(current) = &self.current else {
            return Ok(());
        };
        let text = panel_text(&self.engine, current, panel)?;
        self.texts.set(panel, text);
        Ok(())
    }

    /// Converts `input` with the engine and shows the result in a fresh view.
    ///
    /// Engine failures leave the previous diagram and panels in place.
    pub fn show(&mut self, input: &str, format: InputFormat) -> Result<Option<Frame>> {
        wait_until_ready(&self.engine, self.ready)?;
        let markup = self.engine.to_markup(input, format)?;
        let json = self.engine.to_json(&markup)?;
        let tree = SemanticTree::from_value(&json)?;

        self.commit(Converted {
            input: input.to_string(),
            markup: Some(markup),
            tree,
        })
    }

    /// Shows a previously saved JSON tree without involving the engine's conversions.
    pub fn show_saved(&mut self, json: &str) -> Result<Option<Frame>> {
        let tree = SemanticTree::from_json_str(json)?;
        self.commit(Converted {
            input: String::new(),
            markup: None,
            tree,
        })
    }

    /// Re-shows the current tree in the other direction, keeping what is expanded.
    pub fn change_orientation(&mut self, orientation: Orientation) -> Result<Option<Frame>> {
        if orientation == self.config.direction {
            return Ok(None);
        }
        let config = ViewConfig {
            direction: orientation,
            ..self.config.clone()
        };
        let states = self.view.as_ref().map(|v| v.states().clone());
        let tree = self.current.as_ref().and_then(|c| c.tree.as_ref());
        let mut view = create_view(config.clone(), states);
        view.set_descriptions(descriptions(&self.engine, tree));
        let frame = view.load_tree(tree, LoadOptions { rerun: true })?;

        self.config = config;
        self.view = Some(view);
        Ok(frame)
    }

    pub fn share_link(&self) -> ShareLink {
        ShareLink::new(self.panels, self.input())
    }

    /// Restores the panels and input of a shared link.
    pub fn restore(&mut self, link: &ShareLink) -> Result<Option<Frame>> {
        self.panels = link.panels;
        if link.input.is_empty() {
            return Ok(None);
        }
        self.show(&link.input, InputFormat::default())
    }

    /// Builds the view for `converted` and only then replaces the current one, so a tree that
    /// fails to load leaves the previous diagram and panels untouched.
    fn commit(&mut self, converted: Converted) -> Result<Option<Frame>> {
        let mut texts = PanelTexts::default();
        for panel in Panel::ALL {
            if self.panels.is_shown(panel) {
                texts.set(panel, panel_text(&self.engine, &converted, panel)?);
            }
        }

        let mut view = create_view(self.config.clone(), None);
        view.set_descriptions(descriptions(&self.engine, converted.tree.as_ref()));
        let frame = view.load_tree(converted.tree.as_ref(), LoadOptions::default())?;

        // One live view: assigning drops the previous one.
        self.view = Some(view);
        self.current = Some(converted);
        self.texts = texts;
        Ok(frame)
    }
}

fn descriptions<E: SemanticEngine>(
    engine: &E,
    tree: Option<&SemanticTree>,
) -> FxHashMap<NodeId, String> {
    let mut out = FxHashMap::default();
    let Some(tree) = tree else {
        return out;
    };
    let mut stack: Vec<&SemanticNode> = vec![tree.root()];
    while let Some(node) = stack.pop() {
        if let Some(desc) = engine.describe(tree, node.id) {
            out.insert(node.id, desc);
        }
        stack.extend(node.children.iter());
    }
    out
}

fn panel_text<E: SemanticEngine>(
    engine: &E,
    converted: &Converted,
    panel: Panel,
) -> Result<Option<String>> {
    let markup = converted.markup.as_deref();
    Ok(match panel {
        Panel::Markup => markup.map(str::to_string),
        Panel::Json => converted
            .tree
            .as_ref()
            .map(SemanticTree::to_pretty_json)
            .transpose()?,
        Panel::Annotated => markup.map(|m| engine.annotate(m)).transpose()?,
        Panel::Semantics => markup.map(|m| engine.semantic_dump(m)).transpose()?,
    })
}
