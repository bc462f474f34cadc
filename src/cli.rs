use crate::export::ExportFormat;
use crate::layout::LayoutKind;
use crate::model::IssueSeverity;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flowmap")]
#[command(about = "Validate, lay out and edit task workflows")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase diagnostic logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate a workflow file and report structural issues
    Check(CheckArgs),

    /// Draw a workflow as SVG or PNG
    Render(RenderArgs),

    /// Write the canonical JSON form of a workflow
    Export(ExportArgs),

    /// Append a new task to a workflow
    Add(AddArgs),

    /// Delete a task and every reference to it
    Delete(DeleteArgs),

    /// List the component types used in a workflow
    Types(TypesArgs),

    /// Copy the canonical JSON to the system clipboard
    Copy(CopyArgs),

    /// Launch the interactive browser viewer
    Serve(ServeArgs),

    /// Generate a starter .flowmap.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Workflow JSON file
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Minimum severity to report
    #[arg(long, default_value = "info")]
    pub min_severity: IssueSeverity,
}

#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    /// Workflow JSON file
    pub file: PathBuf,

    /// Output image (format inferred from the extension unless --format is given)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Layout algorithm (defaults to the configured layout)
    #[arg(short, long)]
    pub layout: Option<LayoutKind>,

    /// Image format
    #[arg(short, long)]
    pub format: Option<ImageFormat>,

    /// Pixel scale for PNG output
    #[arg(long, default_value = "1.0")]
    pub scale: f32,

    /// Background colour for PNG output (transparent when omitted)
    #[arg(long)]
    pub background: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// Workflow JSON file
    pub file: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    /// Workflow JSON file
    pub file: PathBuf,

    /// Component type of the new task
    #[arg(short = 't', long = "type")]
    pub task_type: String,

    /// Display name of the new task
    #[arg(short, long)]
    pub name: Option<String>,

    /// Write the result here instead of updating the input file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Workflow JSON file
    pub file: PathBuf,

    /// Id of the task to delete
    pub task_id: String,

    /// Write the result here instead of updating the input file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct TypesArgs {
    /// Workflow JSON file
    pub file: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct CopyArgs {
    /// Workflow JSON file
    pub file: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Workflow to open (starts empty when omitted)
    pub file: Option<PathBuf>,

    /// Port for HTTP server
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Export the viewer as static HTML file instead of serving
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .flowmap.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl From<ImageFormat> for ExportFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Svg => ExportFormat::Svg,
            ImageFormat::Png => ExportFormat::Png,
        }
    }
}
