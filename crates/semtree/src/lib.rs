#![forbid(unsafe_code)]

//! `semtree` draws semantic trees of math expressions as collapsible node-link diagrams.
//!
//! The tree itself comes from an external math engine (see [`SemanticEngine`]); this crate owns
//! the expand/collapse state, the tidy tree layout and the enter/update/exit transitions, and
//! renders them headlessly to SVG.
//!
//! # Features
//!
//! - `raster`: PNG output via pure-Rust SVG rasterization (`semtree::raster`)

pub use semtree_core::*;

pub mod view;
pub mod workbench;

#[cfg(feature = "raster")]
pub mod raster;

pub use view::{Interaction, LoadOptions, View, create_view};
pub use workbench::{PanelTexts, Workbench};

pub mod render {
    pub use semtree_render::{
        Canvas, Frame, LayoutLink, LayoutNode, LinkTransition, NodeTransition, NodeVisual, Phase,
        Scene, Snapshot, SvgRenderOptions, TreeDiagramLayout, render_frame_svg,
    };
}
