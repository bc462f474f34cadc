//! Clean library API for flowmap.
//!
//! This module provides a programmatic interface for using flowmap as a Rust library.
//! Unlike the CLI commands which print output and return exit codes, these functions
//! return proper Result types that can be handled by calling code.
//!
//! # Example
//!
//! ```no_run
//! use flowmap::{load, render, RenderOptions};
//! use std::path::Path;
//!
//! let report = load(Path::new("workflow.json"))?;
//! println!("Loaded {} tasks", report.workflow.len());
//! let svg = render(&report.workflow, &RenderOptions::default())?;
//! std::fs::write("workflow_visualization.svg", svg)?;
//! # Ok::<(), flowmap::FlowmapError>(())
//! ```

use crate::analysis::{self, TaskGraph};
use crate::config::{Config, ConfigError};
use crate::export::{self, ExportError};
use crate::fs::{FileSystem, default_fs};
use crate::layout::{self, LayoutError, LayoutKind, Pins};
use crate::loader::{self, LoadError, LoadReport};
use crate::model::{CheckReport, Workflow};
use crate::render::SvgRenderer;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during flowmap operations.
#[derive(Debug, Error)]
pub enum FlowmapError {
    /// The workflow could not be read, parsed or validated.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The requested layout cannot be computed.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Serialisation or rasterisation failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// IO error while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for the `render` functions.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Layout algorithm; `None` uses the configured default.
    pub layout: Option<LayoutKind>,

    /// Drawing parameters.
    pub config: Config,

    /// Node positions to keep fixed.
    pub pins: Pins,
}

impl RenderOptions {
    /// Default layout with the drawing parameters from `dir/.flowmap.toml`.
    pub fn from_dir(dir: &Path) -> Result<Self, FlowmapError> {
        Ok(Self {
            config: Config::load(dir)?,
            ..Self::default()
        })
    }
}

/// Options for `render_png`.
#[derive(Debug, Clone)]
pub struct PngOptions {
    /// Pixels per SVG unit.
    pub scale: f32,

    /// Fill behind the drawing; transparent when `None`.
    pub background: Option<String>,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: Some("white".to_string()),
        }
    }
}

/// Read and validate a workflow file.
///
/// Fails on malformed JSON, schema violations and any error-severity
/// structural issue. Warnings are returned on the report.
pub fn load(path: &Path) -> Result<LoadReport, FlowmapError> {
    Ok(loader::load_workflow(path, default_fs())?)
}

/// Validate a workflow file and return every issue without rejecting it.
///
/// Only unreadable or malformed files are errors here.
pub fn check(path: &Path) -> Result<CheckReport, FlowmapError> {
    let workflow = loader::read_workflow(path, default_fs())?;
    Ok(analysis::check(path.display().to_string(), workflow))
}

/// Lay out and draw a workflow as an SVG document.
pub fn render(workflow: &Workflow, options: &RenderOptions) -> Result<String, FlowmapError> {
    let kind = options.layout.unwrap_or(options.config.default_layout);
    let graph = TaskGraph::build(workflow);
    let layout = layout::compute(&graph, kind, &options.config, &options.pins)?;
    Ok(SvgRenderer::new(&options.config).render(workflow, &graph, &layout))
}

/// Lay out and draw a workflow as PNG bytes.
pub fn render_png(
    workflow: &Workflow,
    options: &RenderOptions,
    png: &PngOptions,
) -> Result<Vec<u8>, FlowmapError> {
    let svg = render(workflow, options)?;
    Ok(export::to_png(&svg, png.scale, png.background.as_deref())?)
}

/// Canonical pretty-printed JSON for a workflow.
pub fn to_json(workflow: &Workflow) -> Result<String, FlowmapError> {
    Ok(export::to_json(workflow)?)
}

/// Write a workflow to `path` in canonical form.
///
/// The workflow is checked first, so a document the loader would refuse is
/// never written.
pub fn save(workflow: &Workflow, path: &Path) -> Result<(), FlowmapError> {
    let report = loader::accept(workflow.clone())?;
    let json = export::to_json(&report.workflow)?;
    default_fs().write(path, &json)?;
    Ok(())
}
