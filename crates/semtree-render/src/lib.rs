#![forbid(unsafe_code)]

//! Layout passes, transition frames and SVG output for semantic tree views.

pub mod canvas;
pub mod frame;
pub mod layout;
pub mod model;
pub mod pass;
pub mod reconcile;
pub mod svg;

pub use canvas::{Canvas, LabelPlacement};
pub use frame::{Frame, LinkTransition, NodeTransition, NodeVisual, Phase, Snapshot};
pub use layout::layout_visible;
pub use model::{LayoutLink, LayoutNode, TreeDiagramLayout};
pub use pass::{PassOptions, Scene, layout_pass};
pub use reconcile::{Reconciliation, reconcile};
pub use svg::{SvgRenderOptions, render_frame_svg};

