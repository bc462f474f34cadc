use super::{Layout, LayoutError, LayoutKind, Position};
use crate::analysis::{SpanningTree, TaskGraph};
use crate::config::Config;
use std::collections::HashMap;

/// Layered top-down tree layout.
///
/// The acyclic graph is reduced to a spanning forest. Leaves are spaced
/// `horizontal_gap` apart from left to right and every parent sits centred
/// over its first and last child. Trees of a multi-root forest are placed
/// side by side, and the whole drawing is centred on the canvas.
pub fn tidy(graph: &TaskGraph, config: &Config) -> Result<Layout, LayoutError> {
    let forest = graph.spanning_forest().map_err(LayoutError::Cyclic)?;

    let mut placed: HashMap<String, (f64, usize)> = HashMap::new();
    let mut next_leaf = 0usize;
    for tree in &forest {
        place(tree, &mut next_leaf, &mut placed);
    }

    let hgap = config.tree.horizontal_gap;
    let span = next_leaf.saturating_sub(1) as f64;
    let (cx, _) = config.canvas.center();
    let left = cx - span * hgap / 2.0;
    let top = config.canvas.padding + config.node.height / 2.0;

    let positions = graph
        .nodes()
        .filter_map(|id| {
            let &(slot, depth) = placed.get(id)?;
            Some((
                id.to_string(),
                Position::new(
                    left + slot * hgap,
                    top + depth as f64 * config.tree.vertical_gap,
                ),
            ))
        })
        .collect();

    Ok(Layout {
        kind: LayoutKind::Tree,
        positions,
    })
}

/// Placement in leaf-slot units: leaves take consecutive slots in
/// depth-first order, parents sit halfway between their first and last child.
fn place(tree: &SpanningTree, next_leaf: &mut usize, placed: &mut HashMap<String, (f64, usize)>) {
    if tree.nodes.is_empty() {
        return;
    }
    let mut slots = vec![0.0; tree.nodes.len()];

    let mut stack = vec![0usize];
    while let Some(index) = stack.pop() {
        let entry = &tree.nodes[index];
        if entry.children.is_empty() {
            slots[index] = *next_leaf as f64;
            *next_leaf += 1;
        } else {
            stack.extend(entry.children.iter().rev());
        }
    }

    // children always follow their parent in the entry list
    for (index, entry) in tree.nodes.iter().enumerate().rev() {
        if let (Some(&first), Some(&last)) = (entry.children.first(), entry.children.last()) {
            slots[index] = (slots[first] + slots[last]) / 2.0;
        }
        placed.insert(entry.id.clone(), (slots[index], entry.depth));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Task, Workflow};

    #[test]
    fn test_parent_centred_over_children() {
        let workflow = Workflow::new(vec![
            Task::new("root", "x").on_success(["ok"]).on_failure(["err"]),
            Task::new("ok", "x").with_prev(["root"]),
            Task::new("err", "x").with_prev(["root"]),
        ]);
        let config = Config::default();
        let layout = tidy(&TaskGraph::build(&workflow), &config).unwrap();

        let root = layout.get("root").unwrap();
        let ok = layout.get("ok").unwrap();
        let err = layout.get("err").unwrap();

        assert_eq!(root.x, (ok.x + err.x) / 2.0);
        assert_eq!(err.x - ok.x, config.tree.horizontal_gap);
        assert_eq!(ok.y - root.y, config.tree.vertical_gap);
        assert_eq!(root.x, config.canvas.center().0);
        assert_eq!(root.y, config.canvas.padding + config.node.height / 2.0);
    }

    #[test]
    fn test_forest_trees_do_not_overlap() {
        let workflow = Workflow::new(vec![
            Task::new("a", "x").on_success(["a1", "a2"]),
            Task::new("a1", "x").with_prev(["a"]),
            Task::new("a2", "x").with_prev(["a"]),
            Task::new("b", "x").on_success(["b1"]),
            Task::new("b1", "x").with_prev(["b"]),
        ]);
        let layout = tidy(&TaskGraph::build(&workflow), &Config::default()).unwrap();

        let a2 = layout.get("a2").unwrap();
        let b1 = layout.get("b1").unwrap();
        assert!(b1.x > a2.x);
        assert_eq!(layout.get("a").unwrap().y, layout.get("b").unwrap().y);
    }

    #[test]
    fn test_shared_child_placed_once() {
        let workflow = Workflow::new(vec![
            Task::new("s", "x").on_success(["l", "r"]),
            Task::new("l", "x").with_prev(["s"]).on_success(["j"]),
            Task::new("r", "x").with_prev(["s"]).on_success(["j"]),
            Task::new("j", "x").with_prev(["l", "r"]),
        ]);
        let layout = tidy(&TaskGraph::build(&workflow), &Config::default()).unwrap();
        assert_eq!(layout.len(), 4);
        assert_eq!(layout.get("j").unwrap().x, layout.get("l").unwrap().x);
    }

    #[test]
    fn test_long_chain_is_one_column() {
        let n = 20_000;
        let tasks = (0..n)
            .map(|i| {
                let mut task = Task::new(format!("t{}", i), "x");
                if i > 0 {
                    task = task.with_prev([format!("t{}", i - 1)]);
                }
                if i + 1 < n {
                    task = task.on_success([format!("t{}", i + 1)]);
                }
                task
            })
            .collect();
        let config = Config::default();
        let layout = tidy(&TaskGraph::build(&Workflow::new(tasks)), &config).unwrap();

        assert_eq!(layout.len(), n);
        let first = layout.get("t0").unwrap();
        let last = layout.get(&format!("t{}", n - 1)).unwrap();
        assert_eq!(first.x, last.x);
        assert_eq!(last.y - first.y, (n - 1) as f64 * config.tree.vertical_gap);
    }
}
