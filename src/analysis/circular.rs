use crate::analysis::TaskGraph;
use crate::model::Issue;

pub fn detect_cycles(graph: &TaskGraph) -> Vec<Issue> {
    graph.cycles().into_iter().map(Issue::cycle).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IssueKind, Task, Workflow};

    #[test]
    fn test_detect_cycles_reports_each_component() {
        let workflow = Workflow::new(vec![
            Task::new("a", "x").on_success(["b"]),
            Task::new("b", "x").on_success(["a"]),
            Task::new("c", "x").on_failure(["c"]),
        ]);
        let issues = detect_cycles(&TaskGraph::build(&workflow));

        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == IssueKind::Cycle));
        assert_eq!(issues[1].task_ids, vec!["c"]);
    }

    #[test]
    fn test_acyclic_workflow_has_no_cycle_issues() {
        let workflow = Workflow::new(vec![
            Task::new("a", "x").on_success(["b"]).on_failure(["b"]),
            Task::new("b", "x"),
        ]);
        assert!(detect_cycles(&TaskGraph::build(&workflow)).is_empty());
    }
}
