use crate::model::{EdgeKind, Issue, Workflow};
use std::collections::{HashMap, HashSet};

/// Blank and duplicate task ids, and blank types.
pub fn detect_identity_problems(workflow: &Workflow) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for (index, task) in workflow.tasks.iter().enumerate() {
        if task.task_id.trim().is_empty() {
            issues.push(Issue::empty_task_id(index));
            continue;
        }
        if task.task_type.trim().is_empty() {
            issues.push(Issue::empty_task_type(task.task_id.clone()));
        }
        let count = counts.entry(task.task_id.as_str()).or_insert(0);
        if *count == 0 {
            order.push(task.task_id.as_str());
        }
        *count += 1;
    }

    for task_id in order {
        let occurrences = counts[task_id];
        if occurrences > 1 {
            issues.push(Issue::duplicate_task_id(task_id.to_string(), occurrences));
        }
    }

    issues
}

/// References to unknown tasks, repeated successors, and `prev` entries
/// that disagree with the successor lists.
pub fn detect_reference_problems(workflow: &Workflow) -> Vec<Issue> {
    let known: HashSet<&str> = workflow.tasks.iter().map(|t| t.task_id.as_str()).collect();
    let mut issues = Vec::new();

    for task in &workflow.tasks {
        for (field, target) in task.references() {
            if !known.contains(target) {
                issues.push(Issue::dangling_reference(
                    task.task_id.clone(),
                    field,
                    target.to_string(),
                ));
            }
        }

        for kind in EdgeKind::ALL {
            let mut seen = HashSet::new();
            for target in task.successors(kind) {
                if !seen.insert(target.as_str()) && known.contains(target.as_str()) {
                    issues.push(Issue::duplicate_successor(
                        task.task_id.clone(),
                        kind,
                        target.clone(),
                    ));
                }
            }
        }

        for predecessor in &task.prev {
            let Some(pred) = workflow.task(predecessor) else {
                continue;
            };
            let links_back = EdgeKind::ALL
                .iter()
                .any(|&kind| pred.successors(kind).contains(&task.task_id));
            if !links_back {
                issues.push(Issue::inconsistent_predecessor(
                    task.task_id.clone(),
                    predecessor.clone(),
                ));
            }
        }
    }

    issues
}
