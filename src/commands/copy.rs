use crate::cli::CopyArgs;
use crate::export;
use crate::fs::{FileSystem, default_fs};
use crate::style;

use super::open_session;

pub fn cmd_copy(args: CopyArgs) -> i32 {
    cmd_copy_with_fs(args, default_fs())
}

pub fn cmd_copy_with_fs(args: CopyArgs, fs: &dyn FileSystem) -> i32 {
    let session = match open_session(&args.file, fs) {
        Ok(session) => session,
        Err(code) => return code,
    };

    let result = session
        .export_json()
        .and_then(|json| export::copy_to_clipboard(&json));

    match result {
        Ok(()) => {
            style::success(&format!(
                "Copied {} tasks to the clipboard",
                session.workflow().len()
            ));
            0
        }
        Err(e) => {
            style::error(&e.to_string());
            style::hint("use `flowmap export` and copy the output instead");
            1
        }
    }
}
