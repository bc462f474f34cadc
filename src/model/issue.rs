use super::task::{EdgeKind, ReferenceField};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    pub task_ids: Vec<String>,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    EmptyTaskId {
        index: usize,
    },
    EmptyTaskType,
    DuplicateTaskId,
    DanglingReference {
        field: ReferenceField,
        target: String,
    },
    Cycle,
    MultipleRoots,
    NoRoot,
    /// `prev` names a task that does not list this one as a successor
    InconsistentPredecessor {
        predecessor: String,
    },
    DuplicateSuccessor {
        edge: EdgeKind,
        target: String,
    },
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    #[default]
    Info,
    Warn,
    Error,
}

impl Issue {
    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }

    pub fn empty_task_id(index: usize) -> Self {
        Self {
            kind: IssueKind::EmptyTaskId { index },
            severity: IssueSeverity::Error,
            task_ids: Vec::new(),
            message: format!("Task at position {} has an empty taskId", index),
            suggestion: Some("Give every task a non-blank taskId".to_string()),
        }
    }

    pub fn empty_task_type(task_id: String) -> Self {
        Self {
            kind: IssueKind::EmptyTaskType,
            severity: IssueSeverity::Error,
            message: format!("Task `{}` has an empty type", task_id),
            task_ids: vec![task_id],
            suggestion: Some("Every task needs a component type".to_string()),
        }
    }

    pub fn duplicate_task_id(task_id: String, occurrences: usize) -> Self {
        Self {
            kind: IssueKind::DuplicateTaskId,
            severity: IssueSeverity::Error,
            message: format!("taskId `{}` is used by {} tasks", task_id, occurrences),
            task_ids: vec![task_id],
            suggestion: Some("Rename the duplicates so every taskId is unique".to_string()),
        }
    }

    pub fn dangling_reference(task_id: String, field: ReferenceField, target: String) -> Self {
        Self {
            message: format!(
                "`{}`.{} references unknown task `{}`",
                task_id, field, target
            ),
            kind: IssueKind::DanglingReference { field, target },
            severity: IssueSeverity::Error,
            task_ids: vec![task_id],
            suggestion: Some("Add the missing task or remove the reference".to_string()),
        }
    }

    pub fn cycle(members: Vec<String>) -> Self {
        let message = if members.len() == 1 {
            format!("Task `{}` is its own successor", members[0])
        } else {
            let mut path = members.clone();
            path.push(members[0].clone());
            format!("Cycle: {}", path.join(" → "))
        };

        Self {
            kind: IssueKind::Cycle,
            severity: IssueSeverity::Error,
            task_ids: members,
            message,
            suggestion: Some(
                "Workflows must be acyclic; route retries through a dedicated task instead of looping back"
                    .to_string(),
            ),
        }
    }

    pub fn multiple_roots(roots: Vec<String>) -> Self {
        Self {
            kind: IssueKind::MultipleRoots,
            severity: IssueSeverity::Warn,
            message: format!(
                "{} tasks have no predecessor: {}",
                roots.len(),
                roots.join(", ")
            ),
            task_ids: roots,
            suggestion: Some(
                "Tree layout will draw one tree per root; add a single entry task to join them"
                    .to_string(),
            ),
        }
    }

    pub fn no_root() -> Self {
        Self {
            kind: IssueKind::NoRoot,
            severity: IssueSeverity::Error,
            task_ids: Vec::new(),
            message: "Every task has a predecessor; there is no entry task".to_string(),
            suggestion: Some("Clear `prev` on the task the workflow starts from".to_string()),
        }
    }

    pub fn inconsistent_predecessor(task_id: String, predecessor: String) -> Self {
        Self {
            message: format!(
                "`{}` lists `{}` in prev, but `{}` has no successor edge to it",
                task_id, predecessor, predecessor
            ),
            task_ids: vec![task_id, predecessor.clone()],
            kind: IssueKind::InconsistentPredecessor { predecessor },
            severity: IssueSeverity::Info,
            suggestion: Some("Keep prev in sync with nextOnSuccess/nextOnFailure".to_string()),
        }
    }

    pub fn duplicate_successor(task_id: String, edge: EdgeKind, target: String) -> Self {
        Self {
            message: format!(
                "`{}`.{} lists `{}` more than once",
                task_id,
                edge.field(),
                target
            ),
            kind: IssueKind::DuplicateSuccessor { edge, target },
            severity: IssueSeverity::Info,
            task_ids: vec![task_id],
            suggestion: None,
        }
    }
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Info => write!(f, "info"),
            IssueSeverity::Warn => write!(f, "warn"),
            IssueSeverity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for IssueSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(IssueSeverity::Info),
            "warn" | "warning" => Ok(IssueSeverity::Warn),
            "error" => Ok(IssueSeverity::Error),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_closes_the_loop() {
        let issue = Issue::cycle(vec!["a".into(), "b".into()]);
        assert_eq!(issue.message, "Cycle: a → b → a");
        assert!(issue.is_error());
    }

    #[test]
    fn test_severity_ordering_and_parsing() {
        assert!(IssueSeverity::Error > IssueSeverity::Warn);
        assert!(IssueSeverity::Warn > IssueSeverity::Info);
        assert_eq!("warning".parse::<IssueSeverity>(), Ok(IssueSeverity::Warn));
        assert!("loud".parse::<IssueSeverity>().is_err());
    }
}
