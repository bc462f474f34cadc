use crate::cli::{CheckArgs, OutputFormat};
use crate::fs::{FileSystem, default_fs};
use crate::loader;
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter};
use crate::style;
use std::io;

use super::write_output;

pub fn cmd_check(args: CheckArgs) -> i32 {
    cmd_check_with_fs(args, default_fs())
}

pub fn cmd_check_with_fs(args: CheckArgs, fs: &dyn FileSystem) -> i32 {
    // Structural problems are reported, not fatal, so parse without validating
    let workflow = match loader::read_workflow(&args.file, fs) {
        Ok(workflow) => workflow,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let report = crate::analysis::check(args.file.display().to_string(), workflow);

    let mut buffer = Vec::new();
    let format_result = match args.format {
        OutputFormat::Markdown => MarkdownOutput::new(args.min_severity).format(&report, &mut buffer),
        OutputFormat::Json => JsonOutput::new().format(&report, &mut buffer),
    };

    if let Err(e) = format_result {
        style::error(&format!("Failed to format output: {}", e));
        return 1;
    }

    let output_str = String::from_utf8_lossy(&buffer);

    // Render markdown nicely to terminal, or write plain text to file/pipe
    if args.output.is_none() && args.format == OutputFormat::Markdown {
        if let Err(e) = style::render_markdown(&output_str, &mut io::stdout()) {
            style::error(&format!("Failed to write output: {}", e));
            return 1;
        }
    } else if let Err(code) = write_output(fs, args.output.as_deref(), &output_str) {
        return code;
    }

    // Exit code 1 = the workflow would be rejected on load
    if report.has_errors() { 1 } else { 0 }
}
