use crate::cli::RenderArgs;
use crate::export::{self, ExportFormat};
use crate::fs::{FileSystem, default_fs};
use crate::style;

use super::{CommandContext, open_session};

pub fn cmd_render(args: RenderArgs) -> i32 {
    let ctx = match CommandContext::current() {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    cmd_render_with_fs(args, &ctx, default_fs())
}

pub fn cmd_render_with_fs(args: RenderArgs, ctx: &CommandContext, fs: &dyn FileSystem) -> i32 {
    let session = match open_session(&args.file, fs) {
        Ok(session) => session,
        Err(code) => return code,
    };

    let format = args
        .format
        .map(ExportFormat::from)
        .or_else(|| ExportFormat::from_path(&args.output))
        .unwrap_or(ExportFormat::Svg);
    if format == ExportFormat::Json {
        style::error("Use `flowmap export` to write JSON");
        return 1;
    }

    let kind = args.layout.unwrap_or(ctx.config.default_layout);
    let svg = match session.render_svg(kind, &ctx.config) {
        Ok(svg) => svg,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let written = match format {
        ExportFormat::Png => {
            let png = match export::to_png(&svg, args.scale, args.background.as_deref()) {
                Ok(png) => png,
                Err(e) => {
                    style::error(&e.to_string());
                    return 1;
                }
            };
            fs.write_bytes(&args.output, &png)
        }
        _ => fs.write(&args.output, &svg),
    };

    if let Err(e) = written {
        style::error(&format!("Failed to write {}: {}", style::path(&args.output), e));
        return 1;
    }

    style::success(&format!(
        "Rendered {} tasks ({} layout) to {}",
        session.workflow().len(),
        kind,
        style::path(&args.output)
    ));
    0
}
