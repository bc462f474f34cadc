//! Explicit application state for an editing session.
//!
//! A `Session` owns the current workflow plus the purely visual state the
//! viewer keeps (pinned node positions, registered component types). Every
//! mutation goes through a method here so the invariants hold after each
//! step: loads are all-or-nothing, new ids are unique, and deleting a task
//! leaves no reference to it behind.

use crate::analysis::TaskGraph;
use crate::config::Config;
use crate::export::{self, ExportError};
use crate::layout::{self, Layout, LayoutError, LayoutKind, Pins, Position};
use crate::loader::{self, LoadError};
use crate::model::{Issue, Task, Workflow};
use crate::render::{Palette, SvgRenderer};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Component type must not be empty")]
    EmptyType,

    #[error("Component type already exists: {0}")]
    DuplicateType(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    workflow: Workflow,
    warnings: Vec<Issue>,
    pins: Pins,
    custom_types: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a workflow that has already passed validation.
    pub fn from_report(report: loader::LoadReport) -> Self {
        Self {
            workflow: report.workflow,
            warnings: report.warnings,
            ..Self::default()
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Non-fatal issues found by the last load.
    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }

    pub fn pins(&self) -> &Pins {
        &self.pins
    }

    /// Replace the whole state with a newly uploaded document.
    ///
    /// On failure the current workflow, pins and registered types are left
    /// untouched.
    pub fn load_str(&mut self, text: &str) -> Result<&[Issue], SessionError> {
        let report = loader::parse_workflow(text)?;
        info!(tasks = report.workflow.len(), "workflow loaded");
        *self = Self::from_report(report);
        Ok(&self.warnings)
    }

    /// Append a task of the given type with a fresh `task_N` id.
    pub fn add_task(&mut self, task_type: &str, name: Option<&str>) -> Result<String, SessionError> {
        let task_type = task_type.trim();
        if task_type.is_empty() {
            return Err(SessionError::EmptyType);
        }

        let task_id = self.fresh_id();
        let mut task = Task::new(task_id.clone(), task_type);
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            task = task.with_name(name);
        }
        self.workflow.tasks.push(task);
        self.refresh_warnings();

        debug!(task_id = %task_id, task_type, "task added");
        Ok(task_id)
    }

    /// Smallest `task_N` with N at least the new task count that is not
    /// already taken.
    fn fresh_id(&self) -> String {
        let mut n = self.workflow.len() + 1;
        loop {
            let candidate = format!("task_{}", n);
            if !self.workflow.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Remove a task and every reference other tasks hold to it.
    ///
    /// The result must still load: a delete that would leave, say, no entry
    /// task is refused and the session is left as it was.
    pub fn delete_task(&mut self, task_id: &str) -> Result<Task, SessionError> {
        let index = self
            .workflow
            .tasks
            .iter()
            .position(|t| t.task_id == task_id)
            .ok_or_else(|| SessionError::UnknownTask(task_id.to_string()))?;

        let mut workflow = self.workflow.clone();
        let removed = workflow.tasks.remove(index);
        let scrubbed: usize = workflow.tasks.iter_mut().map(|t| t.forget(task_id)).sum();
        let report = loader::accept(workflow)?;

        self.workflow = report.workflow;
        self.warnings = report.warnings;
        self.pins.remove(task_id);

        debug!(task_id, scrubbed, "task deleted");
        Ok(removed)
    }

    /// Task types in the workflow (first-seen order), then registered
    /// types that no task uses yet.
    pub fn component_types(&self) -> Vec<String> {
        let mut types = self.workflow.component_types();
        for custom in &self.custom_types {
            if !types.contains(custom) {
                types.push(custom.clone());
            }
        }
        types
    }

    /// Make a new component type available for `add_task`.
    pub fn register_type(&mut self, task_type: &str) -> Result<(), SessionError> {
        let task_type = task_type.trim();
        if task_type.is_empty() {
            return Err(SessionError::EmptyType);
        }
        if self.component_types().iter().any(|t| t == task_type) {
            return Err(SessionError::DuplicateType(task_type.to_string()));
        }
        self.custom_types.push(task_type.to_string());
        Ok(())
    }

    /// Fix a task at a position, as after dragging it.
    pub fn pin(&mut self, task_id: &str, position: Position) -> Result<(), SessionError> {
        if !self.workflow.contains(task_id) {
            return Err(SessionError::UnknownTask(task_id.to_string()));
        }
        self.pins.insert(task_id.to_string(), position);
        Ok(())
    }

    /// Release a pinned task. Returns whether it was pinned.
    pub fn unpin(&mut self, task_id: &str) -> bool {
        self.pins.remove(task_id).is_some()
    }

    pub fn graph(&self) -> TaskGraph {
        TaskGraph::build(&self.workflow)
    }

    pub fn palette(&self, config: &Config) -> Palette {
        Palette::new(self.component_types(), &config.colors.palette)
    }

    pub fn layout(&self, kind: LayoutKind, config: &Config) -> Result<Layout, LayoutError> {
        layout::compute(&self.graph(), kind, config, &self.pins)
    }

    pub fn render_svg(&self, kind: LayoutKind, config: &Config) -> Result<String, LayoutError> {
        let graph = self.graph();
        let layout = layout::compute(&graph, kind, config, &self.pins)?;
        Ok(SvgRenderer::new(config)
            .with_palette(self.palette(config))
            .render(&self.workflow, &graph, &layout))
    }

    pub fn export_json(&self) -> Result<String, ExportError> {
        export::to_json(&self.workflow)
    }

    fn refresh_warnings(&mut self) {
        self.warnings = crate::analysis::validate(&self.workflow)
            .into_iter()
            .filter(|i| !i.is_error())
            .collect();
    }
}
