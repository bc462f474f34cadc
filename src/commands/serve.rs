use crate::cli::ServeArgs;
use crate::config::Config;
use crate::fs::{FileSystem, default_fs};
use crate::session::Session;
use crate::style;

use super::{CommandContext, open_session};

pub fn cmd_serve(args: ServeArgs) -> i32 {
    let ctx = match CommandContext::current() {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    cmd_serve_with_fs(args, ctx.config, default_fs())
}

pub fn cmd_serve_with_fs(args: ServeArgs, config: Config, fs: &dyn FileSystem) -> i32 {
    let session = match &args.file {
        Some(file) => match open_session(file, fs) {
            Ok(session) => session,
            Err(code) => return code,
        },
        None => Session::new(),
    };

    if let Some(export_path) = &args.export {
        let html = match crate::graph::generate_static_html(&session, &config) {
            Ok(html) => html,
            Err(e) => {
                style::error(&e.to_string());
                return 1;
            }
        };
        if let Err(e) = fs.write(export_path, &html) {
            style::error(&format!("Failed to write export file: {}", e));
            return 1;
        }
        style::success(&format!("Viewer exported to: {}", style::path(export_path)));
        return 0;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to start async runtime: {}", e));
            return 1;
        }
    };

    if let Err(e) = rt.block_on(crate::graph::serve(session, config, args.port, args.open)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{BROKEN, FLOW};
    use crate::fs::mock::MockFs;
    use std::path::{Path, PathBuf};

    fn export_args(file: Option<&str>) -> ServeArgs {
        ServeArgs {
            file: file.map(PathBuf::from),
            port: 3000,
            open: false,
            export: Some(PathBuf::from("/viewer.html")),
        }
    }

    #[test]
    fn test_export_writes_static_viewer() {
        let fs = MockFs::with_files([("/flow.json", FLOW)]);
        assert_eq!(
            cmd_serve_with_fs(export_args(Some("/flow.json")), Config::default(), &fs),
            0
        );

        let html = fs.read_to_string(Path::new("/viewer.html")).unwrap();
        assert!(html.contains("\"taskId\":\"fetch\""));
        assert!(!html.contains("/*__FLOWMAP_DATA__*/null"));
    }

    #[test]
    fn test_export_without_file_is_empty_viewer() {
        let fs = MockFs::new();
        assert_eq!(cmd_serve_with_fs(export_args(None), Config::default(), &fs), 0);
        assert!(fs.exists(Path::new("/viewer.html")));
    }

    #[test]
    fn test_invalid_workflow_is_not_exported() {
        let fs = MockFs::with_files([("/broken.json", BROKEN)]);
        assert_eq!(
            cmd_serve_with_fs(export_args(Some("/broken.json")), Config::default(), &fs),
            1
        );
        assert!(!fs.exists(Path::new("/viewer.html")));
    }
}
