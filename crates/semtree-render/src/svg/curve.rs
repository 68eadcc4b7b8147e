use super::util::fmt_path_into;
use crate::canvas::Canvas;
use semtree_core::Position;

/// Cubic "diagonal" from parent to child: both control points sit halfway along the depth axis,
/// so the curve leaves and enters each node parallel to the layout direction.
pub fn diagonal_path(canvas: &Canvas, source: Position, target: Position) -> String {
    let mid = (source.y + target.y) / 2.0;
    let points = [
        source,
        Position::new(source.x, mid),
        Position::new(target.x, mid),
        target,
    ];

    let mut out = String::with_capacity(64);
    for (i, p) in points.iter().enumerate() {
        match i {
            0 => out.push('M'),
            1 => out.push('C'),
            _ => out.push(' '),
        }
        let (x, y) = canvas.project(*p);
        fmt_path_into(&mut out, x);
        out.push(',');
        fmt_path_into(&mut out, y);
    }
    out
}
