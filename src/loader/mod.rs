//! Validating parser at the load boundary.
//!
//! A workflow is accepted only when it matches the canonical schema and has
//! no error-severity structural issues. Warnings and info issues are kept on
//! the [`LoadReport`] for callers that want to show them.

use crate::analysis;
use crate::fs::FileSystem;
use crate::model::{Issue, Workflow};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid workflow JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Workflow has {} error(s): {}", .0.len(), summarize(.0))]
    Invalid(Vec<Issue>),
}

/// A successfully loaded workflow plus non-fatal findings.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub workflow: Workflow,
    pub warnings: Vec<Issue>,
}

impl LoadError {
    /// Structural issues behind the failure, if any.
    pub fn issues(&self) -> &[Issue] {
        match self {
            LoadError::Invalid(issues) => issues,
            _ => &[],
        }
    }
}

/// Parse without structural validation. Only schema errors fail.
pub fn parse_unchecked(text: &str) -> Result<Workflow, LoadError> {
    Ok(serde_json::from_str(text)?)
}

/// Parse and validate a workflow document.
pub fn parse_workflow(text: &str) -> Result<LoadReport, LoadError> {
    let workflow = parse_unchecked(text)?;
    accept(workflow)
}

/// Validate an already-built workflow, failing on any error-severity issue.
pub fn accept(workflow: Workflow) -> Result<LoadReport, LoadError> {
    let (errors, warnings): (Vec<Issue>, Vec<Issue>) = analysis::validate(&workflow)
        .into_iter()
        .partition(Issue::is_error);

    if !errors.is_empty() {
        debug!(errors = errors.len(), "workflow rejected");
        return Err(LoadError::Invalid(errors));
    }

    debug!(
        tasks = workflow.len(),
        warnings = warnings.len(),
        "workflow accepted"
    );
    Ok(LoadReport { workflow, warnings })
}

/// Read and validate a workflow file.
pub fn load_workflow(path: &Path, fs: &dyn FileSystem) -> Result<LoadReport, LoadError> {
    let text = read_source(path, fs)?;
    parse_workflow(&text)
}

/// Read a workflow file without rejecting structural problems.
pub fn read_workflow(path: &Path, fs: &dyn FileSystem) -> Result<Workflow, LoadError> {
    let text = read_source(path, fs)?;
    parse_unchecked(&text)
}

fn read_source(path: &Path, fs: &dyn FileSystem) -> Result<String, LoadError> {
    debug!(path = %path.display(), "reading workflow");
    fs.read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn summarize(issues: &[Issue]) -> String {
    let shown: Vec<&str> = issues.iter().take(3).map(|i| i.message.as_str()).collect();
    let rest = issues.len().saturating_sub(shown.len());
    if rest > 0 {
        format!("{}; and {} more", shown.join("; "), rest)
    } else {
        shown.join("; ")
    }
}
