mod check;
mod copy;
mod edit;
mod export;
mod init;
mod render;
mod serve;
mod types;

pub use check::cmd_check;
pub use copy::cmd_copy;
pub use edit::{cmd_add, cmd_delete};
pub use export::cmd_export;
pub use init::cmd_init;
pub use render::cmd_render;
pub use serve::cmd_serve;
pub use types::cmd_types;

use crate::config::Config;
use crate::fs::FileSystem;
use crate::loader;
use crate::model::IssueSeverity;
use crate::session::Session;
use crate::style;
use std::path::{Path, PathBuf};

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub dir: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// Resolve the working directory and load its config.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(dir: &Path) -> Result<Self, i32> {
        let resolved = match dir.canonicalize() {
            Ok(p) => p,
            Err(_) => {
                style::error(&format!("Could not resolve path: {}", style::path(dir)));
                return Err(1);
            }
        };

        let config = Config::load(&resolved).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });

        Ok(Self {
            dir: resolved,
            config,
        })
    }

    pub fn current() -> Result<Self, i32> {
        Self::new(Path::new("."))
    }
}

/// Load and validate a workflow file into a fresh session, reporting
/// failures on stderr.
fn open_session(path: &Path, fs: &dyn FileSystem) -> Result<Session, i32> {
    match loader::load_workflow(path, fs) {
        Ok(report) => {
            for issue in report
                .warnings
                .iter()
                .filter(|i| i.severity >= IssueSeverity::Warn)
            {
                style::issue(issue);
            }
            Ok(Session::from_report(report))
        }
        Err(e) => {
            if e.issues().is_empty() {
                style::error(&e.to_string());
            } else {
                style::error(&format!("{} is not a valid workflow", style::path(path)));
                for issue in e.issues() {
                    style::issue(issue);
                }
                style::hint(&format!(
                    "run `flowmap check {}` for the full report",
                    path.display()
                ));
            }
            Err(1)
        }
    }
}

/// Write to `path`, or stdout when there is none.
fn write_output(fs: &dyn FileSystem, path: Option<&Path>, content: &str) -> Result<(), i32> {
    match path {
        Some(path) => fs.write(path, content).map_err(|e| {
            style::error(&format!("Failed to write {}: {}", style::path(path), e));
            1
        }),
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const FLOW: &str = r#"{
        "workflowTasks": [
            {"taskId": "fetch", "type": "http", "nextOnSuccess": ["store"], "nextOnFailure": ["alert"]},
            {"taskId": "store", "type": "sql", "prev": ["fetch"]},
            {"taskId": "alert", "type": "notify", "prev": ["fetch"]}
        ]
    }"#;

    pub const BROKEN: &str = r#"{
        "workflowTasks": [
            {"taskId": "a", "type": "x", "nextOnSuccess": ["b"]},
            {"taskId": "b", "type": "x", "prev": ["a"], "nextOnSuccess": ["a"]}
        ]
    }"#;
}
