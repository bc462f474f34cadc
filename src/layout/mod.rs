//! Node placement: a deterministic force simulation and a layered tree.

mod force;
mod tree;

pub use force::simulate;
pub use tree::tidy;

use crate::analysis::TaskGraph;
use crate::config::Config;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Force,
    Tree,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// User-fixed node positions (drag repositioning).
pub type Pins = HashMap<String, Position>;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Cannot lay out a cyclic workflow as a tree (cycle through {})", .0.join(", "))]
    Cyclic(Vec<String>),
}

/// Computed positions keyed by task id, in graph order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub kind: LayoutKind,
    pub positions: IndexMap<String, Position>,
}

/// Axis-aligned extent of the node centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Layout {
    pub fn get(&self, task_id: &str) -> Option<Position> {
        self.positions.get(task_id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// None for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.positions.values();
        let first = iter.next()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(iter.fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutKind::Force => write!(f, "force"),
            LayoutKind::Tree => write!(f, "tree"),
        }
    }
}

/// Lay out the graph with the requested algorithm. Pinned nodes keep the
/// coordinates they were pinned at.
pub fn compute(
    graph: &TaskGraph,
    kind: LayoutKind,
    config: &Config,
    pins: &Pins,
) -> Result<Layout, LayoutError> {
    let mut layout = match kind {
        LayoutKind::Force => simulate(graph, config, pins),
        LayoutKind::Tree => tidy(graph, config)?,
    };

    for (id, pos) in pins {
        if let Some(slot) = layout.positions.get_mut(id) {
            *slot = *pos;
        }
    }

    Ok(layout)
}
