use crate::config::Config;
use crate::layout::{LayoutError, LayoutKind};
use crate::model::{EdgeKind, Issue};
use crate::session::Session;
use serde::Serialize;
use std::collections::HashSet;

/// Positioned workflow graph in the shape the browser viewer draws.
#[derive(Debug, Clone, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub component_types: Vec<TypeSwatch>,
    pub issues: Vec<Issue>,
    pub metadata: GraphMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub name: Option<String>,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub fan_in: usize,
    pub fan_out: usize,
    pub is_root: bool,
    pub pinned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeSwatch {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphMetadata {
    pub layout: LayoutKind,
    pub total_tasks: usize,
    pub total_links: usize,
    pub root_count: usize,
    pub node_width: f64,
    pub node_height: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub edge_colors: EdgeColors,
}

/// Link and arrowhead colour per outcome.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeColors {
    pub success: String,
    pub failure: String,
}

impl GraphData {
    pub fn from_session(
        session: &Session,
        config: &Config,
        kind: LayoutKind,
    ) -> Result<Self, LayoutError> {
        let graph = session.graph();
        let layout = session.layout(kind, config)?;
        let palette = session.palette(config);
        let roots: HashSet<String> = graph.roots().into_iter().collect();

        let nodes: Vec<GraphNode> = session
            .workflow()
            .tasks
            .iter()
            .filter_map(|task| {
                let pos = layout.get(&task.task_id)?;
                Some(GraphNode {
                    id: task.task_id.clone(),
                    task_type: task.task_type.clone(),
                    name: task.name.clone(),
                    label: task.label(),
                    x: pos.x,
                    y: pos.y,
                    color: palette.color(&task.task_type).to_string(),
                    fan_in: graph.fan_in(&task.task_id),
                    fan_out: graph.fan_out(&task.task_id),
                    is_root: roots.contains(&task.task_id),
                    pinned: session.pins().contains_key(&task.task_id),
                })
            })
            .collect();

        let links: Vec<GraphLink> = graph
            .edges()
            .into_iter()
            .map(|e| GraphLink {
                color: match e.kind {
                    EdgeKind::Success => config.colors.success.clone(),
                    EdgeKind::Failure => config.colors.failure.clone(),
                },
                source: e.source,
                target: e.target,
                kind: e.kind,
            })
            .collect();

        let component_types = palette
            .entries()
            .map(|(name, color)| TypeSwatch {
                name: name.to_string(),
                color: color.to_string(),
            })
            .collect();

        let metadata = GraphMetadata {
            layout: kind,
            total_tasks: nodes.len(),
            total_links: links.len(),
            root_count: roots.len(),
            node_width: config.node.width,
            node_height: config.node.height,
            canvas_width: config.canvas.width,
            canvas_height: config.canvas.height,
            edge_colors: EdgeColors {
                success: config.colors.success.clone(),
                failure: config.colors.failure.clone(),
            },
        };

        Ok(GraphData {
            nodes,
            links,
            component_types,
            issues: session.warnings().to_vec(),
            metadata,
        })
    }
}
