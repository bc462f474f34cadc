//! Coloured terminal output shared by the CLI commands.

use crate::model::{Issue, IssueSeverity};
use colored::Colorize;
use std::io::{self, IsTerminal, Write};

/// Fatal problem, on stderr.
pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

/// Non-fatal problem, on stderr.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

/// Completed action, on stdout.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Dimmed follow-up advice, on stderr.
pub fn hint(msg: &str) {
    eprintln!("{} {}", "hint:".dimmed(), msg.dimmed());
}

/// Print a workflow issue to stderr, labelled by severity, with its
/// suggestion as a hint.
pub fn issue(issue: &Issue) {
    let label = match issue.severity {
        IssueSeverity::Error => "error:".red().bold(),
        IssueSeverity::Warn => "warning:".yellow().bold(),
        IssueSeverity::Info => "info:".blue().bold(),
    };
    eprintln!("{} {}", label, issue.message);
    if let Some(suggestion) = &issue.suggestion {
        hint(suggestion);
    }
}

/// Neutral progress line.
pub fn status(msg: &str) {
    println!("{} {}", "→".blue(), msg);
}

/// Path highlighted for messages.
pub fn path(p: &std::path::Path) -> String {
    p.display().to_string().bright_white().to_string()
}

/// Indented `label: value` line for listings.
pub fn metric(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {}: {}", label.dimmed(), value.to_string().cyan())
}

/// Bold heading preceded by a blank line.
pub fn section(title: &str) {
    println!("\n{}", title.bold());
}

/// Underlined link for the viewer address.
pub fn url(u: &str) -> String {
    u.bright_blue().underline().to_string()
}

/// Markdown reports go through termimad on a TTY and are written as-is
/// to files and pipes.
pub fn render_markdown(markdown: &str, output: &mut dyn Write) -> io::Result<()> {
    if io::stdout().is_terminal() {
        let skin = create_skin();
        let rendered = skin.term_text(markdown);
        write!(output, "{}", rendered)
    } else {
        // Plain markdown for files/pipes
        write!(output, "{}", markdown)
    }
}

fn create_skin() -> termimad::MadSkin {
    use termimad::*;

    let mut skin = MadSkin::default();

    // Headers - cyan
    skin.set_headers_fg(crossterm::style::Color::Cyan);
    skin.bold.set_fg(crossterm::style::Color::White);

    // Bullet points
    skin.bullet = StyledChar::from_fg_char(crossterm::style::Color::Blue, '•');

    // Task ids are rendered as inline code
    skin.inline_code.set_fg(crossterm::style::Color::Yellow);

    skin
}
