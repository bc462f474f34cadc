use crate::model::{CheckReport, Issue, IssueKind, IssueSeverity};
use crate::output::OutputFormatter;
use std::io::Write;

pub struct MarkdownOutput {
    pub min_severity: IssueSeverity,
}

impl MarkdownOutput {
    pub fn new(min_severity: IssueSeverity) -> Self {
        Self { min_severity }
    }
}

/// Issue groups in report order.
const SECTIONS: [(&str, fn(&IssueKind) -> bool); 5] = [
    ("🔴 Broken Identity", |k| {
        matches!(
            k,
            IssueKind::EmptyTaskId { .. } | IssueKind::EmptyTaskType | IssueKind::DuplicateTaskId
        )
    }),
    ("🔴 Dangling References", |k| {
        matches!(k, IssueKind::DanglingReference { .. })
    }),
    ("🔴 Cycles", |k| matches!(k, IssueKind::Cycle)),
    ("🟡 Entry Points", |k| {
        matches!(k, IssueKind::MultipleRoots | IssueKind::NoRoot)
    }),
    ("🔵 Inconsistent Links", |k| {
        matches!(
            k,
            IssueKind::InconsistentPredecessor { .. } | IssueKind::DuplicateSuccessor { .. }
        )
    }),
];

impl OutputFormatter for MarkdownOutput {
    fn format<W: Write>(&self, report: &CheckReport, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Workflow Check: {}\n", report.source)?;

        writeln!(
            writer,
            "{} tasks, {} edges, roots: {}\n",
            report.workflow.len(),
            report.edge_count,
            if report.roots.is_empty() {
                "none".to_string()
            } else {
                report
                    .roots
                    .iter()
                    .map(|r| format!("`{}`", r))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        )?;

        // Task list
        writeln!(writer, "## Tasks\n")?;
        for task in &report.workflow.tasks {
            let mut line = format!("- `{}` ({})", task.task_id, task.task_type);
            if !task.next_on_success.is_empty() {
                line.push_str(&format!(" → success: [{}]", task.next_on_success.join(", ")));
            }
            if !task.next_on_failure.is_empty() {
                line.push_str(&format!(" → failure: [{}]", task.next_on_failure.join(", ")));
            }
            writeln!(writer, "{}", line)?;
        }

        let filtered: Vec<&Issue> = report
            .issues
            .iter()
            .filter(|i| i.severity >= self.min_severity)
            .collect();

        if filtered.is_empty() {
            writeln!(writer, "\n## No Issues Found\n")?;
            writeln!(writer, "The workflow is well formed.")?;
            return Ok(());
        }

        writeln!(writer, "\n## Issues Found\n")?;

        for (title, belongs) in SECTIONS {
            let group: Vec<_> = filtered.iter().filter(|i| belongs(&i.kind)).collect();
            if group.is_empty() {
                continue;
            }
            writeln!(writer, "### {}\n", title)?;
            for issue in group {
                writeln!(writer, "- [{}] {}", issue.severity, issue.message)?;
                if let Some(ref suggestion) = issue.suggestion {
                    writeln!(writer, "  → {}", suggestion)?;
                }
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::check;
    use crate::model::{Task, Workflow};

    fn render(report: &CheckReport, min: IssueSeverity) -> String {
        let mut buf = Vec::new();
        MarkdownOutput::new(min).format(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_clean_workflow() {
        let report = check(
            "flow.json",
            Workflow::new(vec![
                Task::new("a", "http").on_success(["b"]),
                Task::new("b", "sql").with_prev(["a"]),
            ]),
        );
        let out = render(&report, IssueSeverity::Info);

        assert!(out.starts_with("# Workflow Check: flow.json"));
        assert!(out.contains("2 tasks, 1 edges, roots: `a`"));
        assert!(out.contains("- `a` (http) → success: [b]"));
        assert!(out.contains("## No Issues Found"));
    }

    #[test]
    fn test_issues_grouped_and_filtered() {
        let report = check(
            "flow.json",
            Workflow::new(vec![
                Task::new("a", "x").on_success(["ghost"]),
                Task::new("b", "x"),
            ]),
        );

        let all = render(&report, IssueSeverity::Info);
        assert!(all.contains("### 🔴 Dangling References"));
        assert!(all.contains("### 🟡 Entry Points"));

        let errors_only = render(&report, IssueSeverity::Error);
        assert!(errors_only.contains("### 🔴 Dangling References"));
        assert!(!errors_only.contains("Entry Points"));
    }
}
