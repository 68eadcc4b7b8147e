mod curve;
mod util;

pub use curve::diagonal_path;

use crate::frame::{Frame, Phase};
use std::fmt::Write as _;
use util::{escape_xml, escape_xml_into, fmt, fmt_into};

#[derive(Debug, Clone, PartialEq)]
pub struct SvgRenderOptions {
    /// Optional id for the root `<svg>` element.
    pub diagram_id: Option<String>,
    /// Fills the whole canvas (margins included) when set.
    pub background: Option<String>,
    pub link_stroke: String,
    pub marker_stroke: String,
    pub font_family: String,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            background: None,
            link_stroke: "#ccc".to_string(),
            marker_stroke: "steelblue".to_string(),
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Renders `frame` at raw progress `t` (`1.0` is the settled state).
pub fn render_frame_svg(frame: &Frame, t: f64, options: &SvgRenderOptions) -> String {
    let canvas = &frame.canvas;
    let (w, h) = canvas.outer_size();
    let snapshot = frame.sample(t);

    let mut out = String::with_capacity(256 + snapshot.nodes.len() * 256);
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg""#);
    if let Some(id) = &options.diagram_id {
        let _ = write!(out, r#" id="{}""#, escape_xml(id));
    }
    let _ = write!(
        out,
        r#" class="semtree" data-orientation="{}" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        canvas.orientation,
        fmt(w),
        fmt(h),
        fmt(w),
        fmt(h)
    );
    out.push_str(
        "<style>.node circle{cursor:pointer;stroke-width:1.5px}.link{fill:none;stroke-width:1.5px}</style>",
    );
    if let Some(bg) = &options.background {
        let _ = write!(
            out,
            r#"<rect class="background" width="{}" height="{}" fill="{}"/>"#,
            fmt(w),
            fmt(h),
            escape_xml(bg)
        );
    }
    let _ = write!(
        out,
        r#"<g transform="translate({},{})">"#,
        fmt(canvas.margin[3]),
        fmt(canvas.margin[0])
    );

    for link in &snapshot.links {
        let _ = write!(
            out,
            r#"<path class="link" data-source="{}" data-target="{}" fill="none" stroke="{}" d="{}"/>"#,
            link.source,
            link.target,
            escape_xml(&options.link_stroke),
            diagonal_path(canvas, link.from, link.to)
        );
    }

    for node in &snapshot.nodes {
        let (x, y) = canvas.project(node.position);
        let placement = canvas.label_placement(node.visual.has_children);
        out.push_str(r#"<g class="node"#);
        if node.phase == Phase::Exit {
            out.push_str(" exiting");
        }
        let _ = write!(out, r#"" data-id="{}" transform="translate("#, node.id);
        fmt_into(&mut out, x);
        out.push(',');
        fmt_into(&mut out, y);
        out.push_str(")\"><title>");
        escape_xml_into(&mut out, &node.visual.tooltip);
        out.push_str("</title><circle r=\"");
        fmt_into(&mut out, node.radius);
        let _ = write!(
            out,
            r#"" fill="{}" stroke="{}"/>"#,
            node.visual.marker_fill,
            escape_xml(&options.marker_stroke)
        );
        let _ = write!(
            out,
            r#"<text x="{}" dy="{}" text-anchor="{}" font-family="{}" font-size="{}" fill="{}" fill-opacity="{}">"#,
            fmt(placement.x),
            placement.dy,
            placement.anchor,
            escape_xml(&options.font_family),
            fmt(frame.font_size),
            node.visual.color,
            fmt(node.text_opacity)
        );
        escape_xml_into(&mut out, &node.visual.label);
        out.push_str("</text></g>");
    }

    out.push_str("</g></svg>");
    out
}
