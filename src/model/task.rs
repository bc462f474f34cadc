use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A workflow document in canonical form.
///
/// `workflowTasks` is the only accepted top-level key. Variants such as
/// `WorkflowTasks` or `workFlowTasks` are rejected by the parser instead of
/// being silently read as an empty workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workflow {
    #[serde(rename = "workflowTasks")]
    pub tasks: Vec<Task>,
}

/// A single task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Task {
    pub task_id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub prev: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub next_on_success: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub next_on_failure: Vec<String>,
}

/// `null` and a missing field both mean "no references". A bare string is
/// still a type error.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome a successor edge is taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Success,
    Failure,
}

/// The reference-carrying fields of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceField {
    Prev,
    NextOnSuccess,
    NextOnFailure,
}

impl Task {
    pub fn new(task_id: impl Into<String>, task_type: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            task_type: task_type.into(),
            name: None,
            prev: Vec::new(),
            next_on_success: Vec::new(),
            next_on_failure: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_prev<I, S>(mut self, prev: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prev = prev.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_success<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.next_on_success = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_failure<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.next_on_failure = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Successor list for the given outcome.
    pub fn successors(&self, kind: EdgeKind) -> &[String] {
        match kind {
            EdgeKind::Success => &self.next_on_success,
            EdgeKind::Failure => &self.next_on_failure,
        }
    }

    /// Every `(field, target)` reference this task makes, in field order.
    pub fn references(&self) -> impl Iterator<Item = (ReferenceField, &str)> {
        self.prev
            .iter()
            .map(|t| (ReferenceField::Prev, t.as_str()))
            .chain(
                self.next_on_success
                    .iter()
                    .map(|t| (ReferenceField::NextOnSuccess, t.as_str())),
            )
            .chain(
                self.next_on_failure
                    .iter()
                    .map(|t| (ReferenceField::NextOnFailure, t.as_str())),
            )
    }

    /// Remove every reference to `task_id`. Returns how many were removed.
    pub fn forget(&mut self, task_id: &str) -> usize {
        let before = self.prev.len() + self.next_on_success.len() + self.next_on_failure.len();
        self.prev.retain(|t| t != task_id);
        self.next_on_success.retain(|t| t != task_id);
        self.next_on_failure.retain(|t| t != task_id);
        before - (self.prev.len() + self.next_on_success.len() + self.next_on_failure.len())
    }

    /// Label drawn on the node: `"{taskId} ({type})"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.task_id, self.task_type)
    }
}

impl Workflow {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.task(task_id).is_some()
    }

    /// Distinct task types in order of first appearance.
    pub fn component_types(&self) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        for task in &self.tasks {
            if !types.contains(&task.task_type) {
                types.push(task.task_type.clone());
            }
        }
        types
    }
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 2] = [EdgeKind::Success, EdgeKind::Failure];

    pub fn field(self) -> ReferenceField {
        match self {
            EdgeKind::Success => ReferenceField::NextOnSuccess,
            EdgeKind::Failure => ReferenceField::NextOnFailure,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Success => write!(f, "success"),
            EdgeKind::Failure => write!(f, "failure"),
        }
    }
}

impl fmt::Display for ReferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceField::Prev => write!(f, "prev"),
            ReferenceField::NextOnSuccess => write!(f, "nextOnSuccess"),
            ReferenceField::NextOnFailure => write!(f, "nextOnFailure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_missing_lists_are_empty() {
        let task: Task = serde_json::from_str(
            r#"{"taskId": "a", "type": "http", "prev": null, "nextOnSuccess": null}"#,
        )
        .unwrap();

        assert!(task.prev.is_empty());
        assert!(task.next_on_success.is_empty());
        assert!(task.next_on_failure.is_empty());
        assert_eq!(task.name, None);
    }

    #[test]
    fn test_scalar_successor_is_rejected() {
        let result: Result<Task, _> =
            serde_json::from_str(r#"{"taskId": "a", "type": "http", "nextOnSuccess": "b"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_shape() {
        let task = Task::new("a", "http").on_success(["b"]);
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["taskId"], "a");
        assert_eq!(value["type"], "http");
        assert_eq!(value["nextOnSuccess"], serde_json::json!(["b"]));
        assert_eq!(value["nextOnFailure"], serde_json::json!([]));
        assert!(value.get("prev").is_none());
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_forget_removes_every_reference() {
        let mut task = Task::new("a", "http")
            .with_prev(["x"])
            .on_success(["x", "y"])
            .on_failure(["x"]);

        assert_eq!(task.forget("x"), 3);
        assert!(task.prev.is_empty());
        assert_eq!(task.next_on_success, vec!["y".to_string()]);
        assert!(task.next_on_failure.is_empty());
    }

    #[test]
    fn test_component_types_first_seen_order() {
        let workflow = Workflow::new(vec![
            Task::new("a", "http"),
            Task::new("b", "sql"),
            Task::new("c", "http"),
        ]);
        assert_eq!(workflow.component_types(), vec!["http", "sql"]);
    }
}
