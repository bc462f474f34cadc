use crate::cli::{AddArgs, DeleteArgs};
use crate::fs::{FileSystem, default_fs};
use crate::session::{Session, SessionError};
use crate::style;
use std::path::Path;

use super::{open_session, write_output};

pub fn cmd_add(args: AddArgs) -> i32 {
    cmd_add_with_fs(args, default_fs())
}

pub fn cmd_add_with_fs(args: AddArgs, fs: &dyn FileSystem) -> i32 {
    let mut session = match open_session(&args.file, fs) {
        Ok(session) => session,
        Err(code) => return code,
    };

    let task_id = match session.add_task(&args.task_type, args.name.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let target = args.output.as_deref().unwrap_or(&args.file);
    if let Err(code) = save(&session, target, fs) {
        return code;
    }

    style::success(&format!("Added {} to {}", task_id, style::path(target)));
    style::hint("connect it by editing nextOnSuccess / nextOnFailure of another task");
    0
}

pub fn cmd_delete(args: DeleteArgs) -> i32 {
    cmd_delete_with_fs(args, default_fs())
}

pub fn cmd_delete_with_fs(args: DeleteArgs, fs: &dyn FileSystem) -> i32 {
    let mut session = match open_session(&args.file, fs) {
        Ok(session) => session,
        Err(code) => return code,
    };

    if let Err(e) = session.delete_task(&args.task_id) {
        style::error(&e.to_string());
        if let SessionError::Load(load) = &e {
            load.issues().iter().for_each(style::issue);
            style::hint("the file was left unchanged");
        }
        return 1;
    }

    let target = args.output.as_deref().unwrap_or(&args.file);
    if let Err(code) = save(&session, target, fs) {
        return code;
    }

    style::success(&format!(
        "Deleted {} from {}",
        args.task_id,
        style::path(target)
    ));
    0
}

fn save(session: &Session, target: &Path, fs: &dyn FileSystem) -> Result<(), i32> {
    let json = session.export_json().map_err(|e| {
        style::error(&e.to_string());
        1
    })?;
    write_output(fs, Some(target), &json)
}
