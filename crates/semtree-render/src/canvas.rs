use semtree_core::{Orientation, Position, ViewConfig};
use serde::Serialize;

/// Where a node label sits relative to its marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub x: f64,
    pub dy: &'static str,
    pub anchor: &'static str,
}

/// Drawing extents and axis mapping for one orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    pub orientation: Orientation,
    /// Margins in CSS order: top, right, bottom, left.
    pub margin: [f64; 4],
    /// Inner width (without margins).
    pub width: f64,
    /// Inner height (without margins).
    pub height: f64,
    /// Label placement for nodes with children (leading side).
    pub label_before: LabelPlacement,
    /// Label placement for leaves (trailing side).
    pub label_after: LabelPlacement,
}

impl Canvas {
    pub fn new(config: &ViewConfig, orientation: Orientation) -> Self {
        let (margin, before_x, after_x, before_dy, after_dy) = match orientation {
            Orientation::TopToBottom => ([50.0, 20.0, 50.0, 20.0], 0.0, -3.0, "-.5em", "1.2em"),
            Orientation::LeftToRight => {
                ([20.0, 120.0, 20.0, 120.0], -10.0, 10.0, "-.1em", "0.35em")
            }
        };
        Self {
            orientation,
            margin,
            width: (config.canvas_width - margin[1] - margin[3]).max(1.0),
            height: (config.canvas_height - margin[0] - margin[2]).max(1.0),
            label_before: LabelPlacement {
                x: before_x,
                dy: before_dy,
                anchor: "end",
            },
            label_after: LabelPlacement {
                x: after_x,
                dy: after_dy,
                anchor: "start",
            },
        }
    }

    /// `(breadth, depth)` extents handed to the tree layout.
    pub fn layout_extent(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::TopToBottom => (self.width, self.height),
            Orientation::LeftToRight => (self.height, self.width),
        }
    }

    /// Where a fresh root grows from: the middle of the breadth axis, depth zero.
    pub fn root_anchor(&self) -> Position {
        Position::new(self.layout_extent().0 / 2.0, 0.0)
    }

    /// Maps a layout-space position to screen coordinates (relative to the margin box).
    pub fn project(&self, p: Position) -> (f64, f64) {
        match self.orientation {
            Orientation::TopToBottom => (p.x, p.y),
            Orientation::LeftToRight => (p.y, p.x),
        }
    }

    pub fn outer_size(&self) -> (f64, f64) {
        (
            self.width + self.margin[1] + self.margin[3],
            self.height + self.margin[0] + self.margin[2],
        )
    }

    pub fn label_placement(&self, has_children: bool) -> LabelPlacement {
        if has_children {
            self.label_before
        } else {
            self.label_after
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_extents_match_the_page() {
        let cfg = ViewConfig::default();
        let tb = Canvas::new(&cfg, Orientation::TopToBottom);
        assert_eq!((tb.width, tb.height), (1240.0, 700.0));
        assert_eq!(tb.layout_extent(), (1240.0, 700.0));
        assert_eq!(tb.outer_size(), (1280.0, 800.0));

        let lr = Canvas::new(&cfg, Orientation::LeftToRight);
        assert_eq!((lr.width, lr.height), (1040.0, 760.0));
        assert_eq!(lr.layout_extent(), (760.0, 1040.0));
        assert_eq!(lr.root_anchor(), Position::new(380.0, 0.0));
    }

    #[test]
    fn left_right_swaps_axes() {
        let lr = Canvas::new(&ViewConfig::default(), Orientation::LeftToRight);
        assert_eq!(lr.project(Position::new(10.0, 200.0)), (200.0, 10.0));
        assert_eq!(lr.label_placement(true).anchor, "end");
        assert_eq!(lr.label_placement(false).x, 10.0);
    }
}
