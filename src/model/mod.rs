mod issue;
mod task;

pub use issue::{Issue, IssueKind, IssueSeverity};
pub use task::{EdgeKind, ReferenceField, Task, Workflow};

/// A parsed workflow together with every structural issue found in it.
pub struct CheckReport {
    pub source: String,
    pub workflow: Workflow,
    pub issues: Vec<Issue>,
    pub roots: Vec<String>,
    pub edge_count: usize,
}

impl CheckReport {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.is_error())
    }
}
