#![forbid(unsafe_code)]

//! Semantic tree model + display state (headless).
//!
//! Design goals:
//! - the input tree is owned by an external math engine; we only consume its JSON form
//! - expand/collapse state is explicit data (`DisplayTree` + `VisibilityState`), never aliasing
//! - deterministic, testable outputs

pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod link;
pub mod orientation;
pub mod shape;
pub mod tree;
pub mod visibility;

pub use config::ViewConfig;
pub use display::{DisplayNode, DisplayTree, NodeRef, Position};
pub use engine::{EngineError, InputFormat, ReadyPolicy, SemanticEngine, wait_until_ready};
pub use error::{Error, Result};
pub use link::{Panel, PanelFlags, ShareLink};
pub use orientation::Orientation;
pub use shape::NodeShape;
pub use tree::{NodeId, SemanticNode, SemanticTree};
pub use visibility::VisibilityState;
