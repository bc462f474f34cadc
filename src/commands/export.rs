use crate::cli::ExportArgs;
use crate::fs::{FileSystem, default_fs};
use crate::style;

use super::{open_session, write_output};

pub fn cmd_export(args: ExportArgs) -> i32 {
    cmd_export_with_fs(args, default_fs())
}

pub fn cmd_export_with_fs(args: ExportArgs, fs: &dyn FileSystem) -> i32 {
    let session = match open_session(&args.file, fs) {
        Ok(session) => session,
        Err(code) => return code,
    };

    let json = match session.export_json() {
        Ok(json) => json,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    if let Err(code) = write_output(fs, args.output.as_deref(), &json) {
        return code;
    }

    if let Some(path) = &args.output {
        style::success(&format!("Workflow exported to {}", style::path(path)));
    }
    0
}
