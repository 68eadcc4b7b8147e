//! One layout pass's transition plan.
//!
//! A [`Frame`] is data only: start and end states for every node and link that is drawn before,
//! during or after the pass. [`Frame::sample`] evaluates it at a progress value so callers can
//! animate at their own frame rate or render a single still.

use crate::canvas::Canvas;
use semtree_core::{NodeId, Position};
use serde::Serialize;
use std::time::Duration;

/// Marker radius used for nodes that are growing in or shrinking away.
pub const VANISHING: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Enter,
    Update,
    Exit,
}

/// How a node is drawn, independent of where.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeVisual {
    pub label: String,
    pub color: &'static str,
    pub marker_fill: &'static str,
    pub has_children: bool,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeTransition {
    pub id: NodeId,
    pub phase: Phase,
    pub from: Position,
    pub to: Position,
    pub visual: NodeVisual,
}

/// A parent/child edge, keyed by its target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTransition {
    pub source: NodeId,
    pub target: NodeId,
    pub phase: Phase,
    pub from: (Position, Position),
    pub to: (Position, Position),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub anchor: NodeId,
    /// Where the anchor was drawn before the pass; entering elements start here.
    pub anchor_from: Position,
    /// Where the anchor is drawn after the pass; exiting elements end here.
    pub anchor_to: Position,
    pub duration_ms: u64,
    pub canvas: Canvas,
    pub marker_radius: f64,
    pub font_size: f64,
    pub nodes: Vec<NodeTransition>,
    pub links: Vec<LinkTransition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot<'a> {
    pub id: NodeId,
    pub phase: Phase,
    pub position: Position,
    pub radius: f64,
    pub text_opacity: f64,
    pub visual: &'a NodeVisual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkSnapshot {
    pub source: NodeId,
    pub target: NodeId,
    pub from: Position,
    pub to: Position,
}

/// Everything drawn at one instant of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'a> {
    pub nodes: Vec<NodeSnapshot<'a>>,
    pub links: Vec<LinkSnapshot>,
}

/// d3's default transition easing (`cubic-in-out`).
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

fn mix(a: f64, b: f64, k: f64) -> f64 {
    a * (1.0 - k) + b * k
}

impl Frame {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Maps elapsed time to raw progress in `[0, 1]`.
    pub fn progress_at(&self, elapsed: Duration) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (elapsed.as_secs_f64() * 1000.0 / self.duration_ms as f64).min(1.0)
    }

    pub fn is_noop(&self) -> bool {
        self.nodes
            .iter()
            .all(|n| n.phase == Phase::Update && n.from == n.to)
            && self
                .links
                .iter()
                .all(|l| l.phase == Phase::Update && l.from == l.to)
    }

    /// Evaluates the frame at raw progress `t`. Exiting elements are dropped once `t >= 1`.
    pub fn sample(&self, t: f64) -> Snapshot<'_> {
        let done = t >= 1.0;
        let k = ease_cubic_in_out(t);
        let r = self.marker_radius;

        let nodes = self
            .nodes
            .iter()
            .filter(|n| !(done && n.phase == Phase::Exit))
            .map(|n| {
                let (radius, text_opacity) = match n.phase {
                    Phase::Enter => (mix(VANISHING, r, k), mix(VANISHING, 1.0, k)),
                    Phase::Update => (r, 1.0),
                    Phase::Exit => (mix(r, VANISHING, k), mix(1.0, VANISHING, k)),
                };
                NodeSnapshot {
                    id: n.id,
                    phase: n.phase,
                    position: n.from.lerp(n.to, k),
                    radius,
                    text_opacity,
                    visual: &n.visual,
                }
            })
            .collect();

        let links = self
            .links
            .iter()
            .filter(|l| !(done && l.phase == Phase::Exit))
            .map(|l| LinkSnapshot {
                source: l.source,
                target: l.target,
                from: l.from.0.lerp(l.to.0, k),
                to: l.from.1.lerp(l.to.1, k),
            })
            .collect();

        Snapshot { nodes, links }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_hits_the_endpoints_and_midpoint() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
        assert!(ease_cubic_in_out(0.75) > 0.75);
        assert_eq!(ease_cubic_in_out(3.0), 1.0);
    }

    #[test]
    fn progress_saturates() {
        let frame = Frame {
            anchor: NodeId(1),
            anchor_from: Position::default(),
            anchor_to: Position::default(),
            duration_ms: 500,
            canvas: Canvas::new(
                &semtree_core::ViewConfig::default(),
                semtree_core::Orientation::TopToBottom,
            ),
            marker_radius: 4.5,
            font_size: 20.0,
            nodes: Vec::new(),
            links: Vec::new(),
        };
        assert_eq!(frame.progress_at(Duration::from_millis(250)), 0.5);
        assert_eq!(frame.progress_at(Duration::from_secs(2)), 1.0);
        assert!(frame.is_noop());
    }
}
