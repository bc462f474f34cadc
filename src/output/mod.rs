mod json;
mod markdown;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;

use crate::model::CheckReport;
use std::io::Write;

pub trait OutputFormatter {
    fn format<W: Write>(&self, report: &CheckReport, writer: &mut W) -> std::io::Result<()>;
}
