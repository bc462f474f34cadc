mod circular;
mod graph;
mod references;
mod roots;

pub use circular::detect_cycles;
pub use graph::{Edge, SpanningTree, TaskGraph, TreeEntry};
pub use references::{detect_identity_problems, detect_reference_problems};
pub use roots::detect_root_problems;

use crate::model::{CheckReport, Issue, Workflow};

/// Run every structural check over a parsed workflow.
pub fn validate(workflow: &Workflow) -> Vec<Issue> {
    let graph = TaskGraph::build(workflow);
    validate_with_graph(workflow, &graph)
}

fn validate_with_graph(workflow: &Workflow, graph: &TaskGraph) -> Vec<Issue> {
    let mut issues = Vec::new();

    // Identity problems
    issues.extend(detect_identity_problems(workflow));

    // Dangling and inconsistent references
    issues.extend(detect_reference_problems(workflow));

    // Cycles
    let cycles = detect_cycles(graph);
    let has_cycles = !cycles.is_empty();
    issues.extend(cycles);

    // Entry points
    issues.extend(detect_root_problems(graph, has_cycles));

    issues
}

/// Validate a workflow and summarise it for reporting.
pub fn check(source: impl Into<String>, workflow: Workflow) -> CheckReport {
    let graph = TaskGraph::build(&workflow);
    let issues = validate_with_graph(&workflow, &graph);
    let roots = graph.roots();
    let edge_count = graph.edge_count();

    CheckReport {
        source: source.into(),
        workflow,
        issues,
        roots,
        edge_count,
    }
}
