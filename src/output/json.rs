use crate::model::{CheckReport, Issue};
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    valid: bool,
    tasks: Vec<JsonTask<'a>>,
    roots: &'a [String],
    edge_count: usize,
    issues: &'a [Issue],
}

#[derive(Serialize)]
struct JsonTask<'a> {
    task_id: &'a str,
    #[serde(rename = "type")]
    task_type: &'a str,
    name: Option<&'a str>,
    next_on_success: &'a [String],
    next_on_failure: &'a [String],
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, report: &CheckReport, writer: &mut W) -> std::io::Result<()> {
        let json_report = JsonReport {
            source: &report.source,
            valid: !report.has_errors(),
            tasks: report
                .workflow
                .tasks
                .iter()
                .map(|t| JsonTask {
                    task_id: &t.task_id,
                    task_type: &t.task_type,
                    name: t.name.as_deref(),
                    next_on_success: &t.next_on_success,
                    next_on_failure: &t.next_on_failure,
                })
                .collect(),
            roots: &report.roots,
            edge_count: report.edge_count,
            issues: &report.issues,
        };

        let json = serde_json::to_string_pretty(&json_report).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::check;
    use crate::model::{Task, Workflow};

    #[test]
    fn test_json_report_shape() {
        let report = check(
            "flow.json",
            Workflow::new(vec![Task::new("a", "x").on_success(["missing"])]),
        );
        let mut buf = Vec::new();
        JsonOutput::new().format(&report, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["source"], "flow.json");
        assert_eq!(value["valid"], false);
        assert_eq!(value["tasks"][0]["type"], "x");
        assert_eq!(value["issues"][0]["kind"]["kind"], "dangling_reference");
        assert_eq!(value["issues"][0]["severity"], "error");
    }
}
