//! Serialising the in-memory workflow and its drawing.

mod raster;

pub use raster::{parse_color, to_png};

use crate::layout::LayoutError;
use crate::model::Workflow;
use std::path::Path;
use thiserror::Error;

pub const JSON_FILE_NAME: &str = "updated_workflow.json";
pub const SVG_FILE_NAME: &str = "workflow_visualization.svg";
pub const PNG_FILE_NAME: &str = "workflow_visualization.png";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize workflow: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse SVG for rasterization: {0}")]
    Svg(String),

    #[error("Failed to rasterize: {0}")]
    Raster(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Svg,
    Png,
}

impl ExportFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Svg => "image/svg+xml;charset=utf-8",
            Self::Png => "image/png",
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Json => JSON_FILE_NAME,
            Self::Svg => SVG_FILE_NAME,
            Self::Png => PNG_FILE_NAME,
        }
    }
}

/// Pretty-printed JSON with two-space indentation.
pub fn to_json(workflow: &Workflow) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(workflow)?)
}

/// Put text on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), ExportError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| ExportError::Clipboard(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_workflow;
    use crate::model::Task;

    #[test]
    fn test_json_round_trip() {
        let workflow = Workflow::new(vec![
            Task::new("fetch", "http")
                .with_name("Fetch input")
                .on_success(["store"])
                .on_failure(["alert"]),
            Task::new("store", "sql").with_prev(["fetch"]),
            Task::new("alert", "notify").with_prev(["fetch"]),
        ]);

        let json = to_json(&workflow).unwrap();
        let reloaded = parse_workflow(&json).unwrap().workflow;
        assert_eq!(reloaded, workflow);
    }

    #[test]
    fn test_json_is_pretty_printed() {
        let json = to_json(&Workflow::new(vec![Task::new("a", "x")])).unwrap();
        assert!(json.starts_with("{\n  \"workflowTasks\": [\n    {\n"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/flow.SVG")),
            Some(ExportFormat::Svg)
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("flow.png")),
            Some(ExportFormat::Png)
        );
        assert_eq!(ExportFormat::from_path(Path::new("flow")), None);
        assert_eq!(ExportFormat::from_path(Path::new("flow.pdf")), None);
    }
}
