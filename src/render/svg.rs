use super::{Palette, escape_xml, fmt_num};
use crate::analysis::TaskGraph;
use crate::config::Config;
use crate::layout::{Layout, Position};
use crate::model::{EdgeKind, Workflow};
use std::fmt::Write;

/// Draws a laid-out workflow as a standalone SVG document.
///
/// Nodes are rounded rectangles filled by task type and labelled
/// `"{taskId} ({type})"`. Links are straight lines clipped to the node
/// borders, coloured by outcome and ending in an arrowhead.
pub struct SvgRenderer<'a> {
    config: &'a Config,
    palette: Option<Palette>,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            palette: None,
        }
    }

    /// Use a fixed type-to-colour mapping instead of deriving one from the
    /// workflow.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn render(&self, workflow: &Workflow, graph: &TaskGraph, layout: &Layout) -> String {
        let palette = self.palette.clone().unwrap_or_else(|| {
            Palette::new(workflow.component_types(), &self.config.colors.palette)
        });
        let (hw, hh) = (self.config.node.width / 2.0, self.config.node.height / 2.0);
        let pad = self.config.canvas.padding;

        let (min_x, min_y, width, height) = match layout.bounds() {
            Some(b) => (
                b.min_x - hw - pad,
                b.min_y - hh - pad,
                b.width() + 2.0 * (hw + pad),
                b.height() + 2.0 * (hh + pad),
            ),
            None => (0.0, 0.0, self.config.canvas.width, self.config.canvas.height),
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}" font-family="sans-serif">"#,
            x = fmt_num(min_x),
            y = fmt_num(min_y),
            w = fmt_num(width),
            h = fmt_num(height),
        );

        out.push_str("  <defs>\n");
        for kind in EdgeKind::ALL {
            let _ = writeln!(
                out,
                r#"    <marker id="arrow-{kind}" viewBox="0 -5 10 10" refX="10" refY="0" markerWidth="6" markerHeight="6" orient="auto"><path d="M0,-5L10,0L0,5" fill="{color}"/></marker>"#,
                kind = kind,
                color = escape_xml(self.edge_color(kind)),
            );
        }
        out.push_str("  </defs>\n");

        out.push_str("  <g class=\"links\">\n");
        for edge in graph.edges() {
            let (Some(from), Some(to)) = (layout.get(&edge.source), layout.get(&edge.target))
            else {
                continue;
            };
            let start = clip_to_rect(to, from, hw, hh);
            let end = clip_to_rect(from, to, hw, hh);
            let _ = writeln!(
                out,
                r#"    <line class="link {kind}" data-source="{src}" data-target="{dst}" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{color}" stroke-width="2" marker-end="url(#arrow-{kind})"/>"#,
                kind = edge.kind,
                src = escape_xml(&edge.source),
                dst = escape_xml(&edge.target),
                x1 = fmt_num(start.x),
                y1 = fmt_num(start.y),
                x2 = fmt_num(end.x),
                y2 = fmt_num(end.y),
                color = escape_xml(self.edge_color(edge.kind)),
            );
        }
        out.push_str("  </g>\n");

        out.push_str("  <g class=\"nodes\">\n");
        for task in &workflow.tasks {
            let Some(pos) = layout.get(&task.task_id) else {
                continue;
            };
            let _ = writeln!(
                out,
                r#"    <g class="node" data-task-id="{id}" transform="translate({x},{y})">"#,
                id = escape_xml(&task.task_id),
                x = fmt_num(pos.x),
                y = fmt_num(pos.y),
            );
            if let Some(name) = &task.name {
                let _ = writeln!(out, "      <title>{}</title>", escape_xml(name));
            }
            let _ = writeln!(
                out,
                r##"      <rect x="{x}" y="{y}" width="{w}" height="{h}" rx="6" fill="{fill}" stroke="#333" stroke-width="1"/>"##,
                x = fmt_num(-hw),
                y = fmt_num(-hh),
                w = fmt_num(2.0 * hw),
                h = fmt_num(2.0 * hh),
                fill = escape_xml(palette.color(&task.task_type)),
            );
            let _ = writeln!(
                out,
                r##"      <text text-anchor="middle" dy=".35em" font-size="11" fill="#fff">{}</text>"##,
                escape_xml(&task.label()),
            );
            out.push_str("    </g>\n");
        }
        out.push_str("  </g>\n");
        out.push_str("</svg>\n");

        out
    }

    fn edge_color(&self, kind: EdgeKind) -> &str {
        match kind {
            EdgeKind::Success => &self.config.colors.success,
            EdgeKind::Failure => &self.config.colors.failure,
        }
    }
}

/// Point where the segment from `from` to the centre of the rectangle at
/// `to` crosses that rectangle's border.
fn clip_to_rect(from: Position, to: Position, hw: f64, hh: f64) -> Position {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0.0 && dy == 0.0 {
        return to;
    }
    let tx = if dx == 0.0 { f64::INFINITY } else { hw / dx.abs() };
    let ty = if dy == 0.0 { f64::INFINITY } else { hh / dy.abs() };
    let t = tx.min(ty).min(1.0);
    Position::new(to.x - dx * t, to.y - dy * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutKind, Pins, compute};
    use crate::model::Task;

    fn render(workflow: &Workflow, kind: LayoutKind) -> String {
        let config = Config::default();
        let graph = TaskGraph::build(workflow);
        let layout = compute(&graph, kind, &config, &Pins::new()).unwrap();
        SvgRenderer::new(&config).render(workflow, &graph, &layout)
    }

    #[test]
    fn test_one_rect_per_task_and_one_line_per_edge() {
        let workflow = Workflow::new(vec![
            Task::new("fetch", "http")
                .on_success(["store"])
                .on_failure(["alert"]),
            Task::new("store", "sql").with_prev(["fetch"]),
            Task::new("alert", "notify").with_prev(["fetch"]),
        ]);
        let svg = render(&workflow, LayoutKind::Tree);

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert_eq!(svg.matches("<rect ").count(), 3);
        assert_eq!(svg.matches("<line ").count(), 2);
        assert!(svg.contains(r#"class="link success""#));
        assert!(svg.contains(r#"stroke="red""#));
        assert!(svg.contains(">fetch (http)</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let workflow = Workflow::new(vec![Task::new("a<b>", "x&y").with_name("\"quoted\"")]);
        let svg = render(&workflow, LayoutKind::Force);

        assert!(svg.contains("a&lt;b&gt; (x&amp;y)"));
        assert!(svg.contains("<title>&quot;quoted&quot;</title>"));
        assert!(!svg.contains("a<b>"));
    }

    #[test]
    fn test_dangling_reference_renders_without_the_edge() {
        let workflow = Workflow::new(vec![Task::new("a", "x").on_success(["ghost"])]);
        let svg = render(&workflow, LayoutKind::Force);

        assert_eq!(svg.matches("<rect ").count(), 1);
        assert_eq!(svg.matches("<line ").count(), 0);
    }

    #[test]
    fn test_empty_workflow_uses_canvas_size() {
        let svg = render(&Workflow::default(), LayoutKind::Force);
        assert!(svg.contains(r#"viewBox="0 0 800 600""#));
    }

    #[test]
    fn test_types_share_colours() {
        let workflow = Workflow::new(vec![
            Task::new("a", "http").on_success(["b"]),
            Task::new("b", "http").with_prev(["a"]),
        ]);
        let svg = render(&workflow, LayoutKind::Tree);
        assert_eq!(svg.matches(r##"fill="#1f77b4""##).count(), 2);
    }

    #[test]
    fn test_clip_to_rect_stops_at_border() {
        let from = Position::new(0.0, 0.0);
        let to = Position::new(200.0, 0.0);
        assert_eq!(clip_to_rect(from, to, 50.0, 20.0), Position::new(150.0, 0.0));

        let below = Position::new(0.0, 100.0);
        assert_eq!(clip_to_rect(from, below, 50.0, 20.0), Position::new(0.0, 80.0));
    }
}
