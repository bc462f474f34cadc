use crate::analysis::TaskGraph;
use crate::model::Issue;

/// Flag workflows without a single entry task.
///
/// No root is only reported when the graph is acyclic; a cycle already
/// explains a missing entry point.
pub fn detect_root_problems(graph: &TaskGraph, has_cycles: bool) -> Vec<Issue> {
    if graph.node_count() == 0 {
        return Vec::new();
    }

    let roots = graph.roots();
    match roots.len() {
        0 if has_cycles => Vec::new(),
        0 => vec![Issue::no_root()],
        1 => Vec::new(),
        _ => vec![Issue::multiple_roots(roots)],
    }
}
