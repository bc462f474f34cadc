use crate::cli::TypesArgs;
use crate::fs::{FileSystem, default_fs};
use crate::style;

use super::open_session;

pub fn cmd_types(args: TypesArgs) -> i32 {
    cmd_types_with_fs(args, default_fs())
}

pub fn cmd_types_with_fs(args: TypesArgs, fs: &dyn FileSystem) -> i32 {
    let session = match open_session(&args.file, fs) {
        Ok(session) => session,
        Err(code) => return code,
    };

    let types = session.component_types();
    if types.is_empty() {
        style::status("No tasks, so no component types yet");
        return 0;
    }

    style::section("Component types");
    for task_type in &types {
        let count = session
            .workflow()
            .tasks
            .iter()
            .filter(|t| &t.task_type == task_type)
            .count();
        println!("{}", style::metric(task_type, count));
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{BROKEN, FLOW};
    use crate::fs::mock::MockFs;
    use std::path::PathBuf;

    fn types_of(path: &str, fs: &MockFs) -> i32 {
        cmd_types_with_fs(
            TypesArgs {
                file: PathBuf::from(path),
            },
            fs,
        )
    }

    #[test]
    fn test_lists_types_of_valid_workflow() {
        let fs = MockFs::with_files([("/flow.json", FLOW)]);
        assert_eq!(types_of("/flow.json", &fs), 0);
    }

    #[test]
    fn test_empty_workflow_has_no_types() {
        let fs = MockFs::with_files([("/empty.json", r#"{"workflowTasks": []}"#)]);
        assert_eq!(types_of("/empty.json", &fs), 0);
    }

    #[test]
    fn test_invalid_or_missing_workflow_fails() {
        let fs = MockFs::with_files([("/broken.json", BROKEN)]);
        assert_eq!(types_of("/broken.json", &fs), 1);
        assert_eq!(types_of("/missing.json", &fs), 1);
    }
}
