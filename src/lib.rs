pub mod analysis;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod export;
pub mod fs;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod model;
pub mod output;
pub mod render;
pub mod session;
pub mod style;

pub use api::{
    FlowmapError, PngOptions, RenderOptions, check, load, render, render_png, save, to_json,
};
pub use cli::Cli;
pub use commands::{
    cmd_add, cmd_check, cmd_copy, cmd_delete, cmd_export, cmd_init, cmd_render, cmd_serve,
    cmd_types,
};
pub use config::Config;
pub use layout::{Layout, LayoutKind, Position};
pub use loader::{LoadError, LoadReport};
pub use model::{CheckReport, EdgeKind, Issue, IssueKind, IssueSeverity, Task, Workflow};
pub use session::{Session, SessionError};
