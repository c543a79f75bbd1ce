//! UI utilities for the CLI

use colored::*;
use crossterm::terminal::size;

use scribe_core::{BatchReport, TaskKind};
use scribe_pipeline::ProgressEvent;

/// Display startup banner on stderr
pub fn display_banner(task: TaskKind, model: &str, items: usize) {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(60, terminal_width.saturating_sub(4)).max(20);

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));

    let lines = [
        format!("Scribe · {}", task.display_name()),
        format!("model: {model} · items: {items}"),
    ];

    eprintln!();
    eprintln!("{}", top_border.blue());
    for line in lines {
        let padding = (banner_width - 4).saturating_sub(line.chars().count());
        eprintln!("{}", format!("│ {}{} │", line, " ".repeat(padding)).blue());
    }
    eprintln!("{}", bottom_border.blue());
    eprintln!();
}

fn verb(task: TaskKind) -> &'static str {
    match task {
        TaskKind::CodeReview => "Reviewing",
        TaskKind::Sentiment => "Analyzing sentiment of",
        TaskKind::TopicExtraction => "Extracting topics from",
        TaskKind::EmailDraft => "Drafting email from",
        TaskKind::EmailImprovement => "Improving",
        TaskKind::Summarize => "Summarizing",
    }
}

/// Progress line printed before each item
pub fn progress_line(event: &ProgressEvent<'_>) -> String {
    format!(
        "[{}/{}] {} {}",
        event.index,
        event.total,
        verb(event.task),
        event.identity
    )
}

pub fn print_progress(event: &ProgressEvent<'_>) {
    eprintln!("{} {}", "🔍".cyan(), progress_line(event));
}

/// Summarize a finished batch, listing failures with their stage
pub fn print_summary(report: &BatchReport) {
    eprintln!();
    if report.is_fully_ok() {
        eprintln!(
            "{} {} of {} items succeeded",
            "✅".green(),
            report.succeeded(),
            report.len()
        );
        return;
    }

    eprintln!(
        "{} {} of {} items failed",
        "⚠️".yellow(),
        report.failed(),
        report.len()
    );
    for entry in report.entries() {
        if let Some(failure) = entry.result.failure() {
            eprintln!("  {} {}: {}", "•".yellow(), entry.input_identity.bold(), failure);
        }
    }
}

/// Confirmation that the report was written
pub fn print_saved(path: &std::path::Path) {
    eprintln!("{} Report saved to: {}", "📊".green(), path.display());
}

/// Fatal error before or outside the batch
pub fn print_fatal(message: &str) {
    eprintln!("{} {}", "❌".red(), message);
}
