//! Report rendering

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::Write as _;

use scribe_core::{AnalysisResult, BatchReport, Payload, ReportEntry, Result, StructuredPayload};

const TIMESTAMP_PREFIX: &str = "Generated on: ";
const SECTION_RULE: &str = "---";

/// Renders a [`BatchReport`] into a single document.
///
/// Output is a pure function of the report. The only time-dependent content
/// is the optional `Generated on:` line, which always sits directly under the
/// title so it can be stripped before comparing two renders.
#[derive(Debug, Clone, Default)]
pub struct ReportAggregator {
    title: Option<String>,
}

#[derive(Serialize)]
struct Summary {
    total: usize,
    succeeded: usize,
    failed: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_at: Option<String>,
    summary: Summary,
    entries: &'a [ReportEntry],
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed title instead of one derived from the task kinds
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Markdown report without a timestamp line
    pub fn render(&self, report: &BatchReport) -> String {
        self.render_markdown(report, None)
    }

    /// Markdown report with a `Generated on:` header line
    pub fn render_with_timestamp(&self, report: &BatchReport, generated_at: DateTime<Utc>) -> String {
        self.render_markdown(report, Some(generated_at))
    }

    /// Pretty JSON document carrying the same content as the markdown report
    pub fn render_json(&self, report: &BatchReport, generated_at: Option<DateTime<Utc>>) -> Result<String> {
        let document = JsonReport {
            title: self.title_for(report),
            generated_at: generated_at.map(format_timestamp),
            summary: summary(report),
            entries: report.entries(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Drop the timestamp line from a rendered markdown report, if present.
    ///
    /// Only the line directly under the `# ` title is considered; entry
    /// bodies are left untouched.
    pub fn strip_timestamp(rendered: &str) -> String {
        let has_title = rendered.starts_with("# ");
        rendered
            .split_inclusive('\n')
            .enumerate()
            .filter(|(i, line)| !(has_title && *i == 1 && line.starts_with(TIMESTAMP_PREFIX)))
            .map(|(_, line)| line)
            .collect()
    }

    fn render_markdown(&self, report: &BatchReport, generated_at: Option<DateTime<Utc>>) -> String {
        let mut out = String::new();
        let summary = summary(report);

        let _ = writeln!(out, "# {}", self.title_for(report));
        if let Some(at) = generated_at {
            let _ = writeln!(out, "{TIMESTAMP_PREFIX}{}", format_timestamp(at));
        }
        out.push('\n');
        let _ = writeln!(
            out,
            "Items: {} | Succeeded: {} | Failed: {}",
            summary.total, summary.succeeded, summary.failed
        );
        out.push('\n');

        if report.is_empty() {
            out.push_str("_No items were processed._\n");
            return out;
        }

        let mixed = report.common_task().is_none();
        for entry in report.entries() {
            let _ = writeln!(out, "## {}\n", entry.input_identity);
            if mixed {
                let _ = writeln!(out, "_Task: {}_\n", entry.task.display_name());
            }
            render_result(&mut out, &entry.result);
            let _ = writeln!(out, "\n{SECTION_RULE}\n");
        }

        out
    }

    fn title_for(&self, report: &BatchReport) -> String {
        match (&self.title, report.common_task()) {
            (Some(title), _) => title.clone(),
            (None, Some(task)) => format!("{} Report", task.display_name()),
            (None, None) => "Analysis Report".to_string(),
        }
    }
}

fn render_result(out: &mut String, result: &AnalysisResult) {
    match result {
        AnalysisResult::Ok { payload: Payload::Text(text) } => {
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }
        AnalysisResult::Ok { payload: Payload::Structured(structured) } => {
            let json = match structured {
                StructuredPayload::Sentiment(record) => serde_json::to_string_pretty(record),
                StructuredPayload::Topics(list) => serde_json::to_string_pretty(list),
            }
            .unwrap_or_else(|e| format!("\"unrenderable payload: {e}\""));
            let _ = writeln!(out, "```json\n{json}\n```");
        }
        AnalysisResult::Failed(failure) => {
            let _ = writeln!(
                out,
                "**Failed** ({} stage, {}): {}",
                failure.stage(),
                failure.kind.label(),
                failure.detail
            );
        }
    }
}

fn summary(report: &BatchReport) -> Summary {
    Summary {
        total: report.len(),
        succeeded: report.succeeded(),
        failed: report.failed(),
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use scribe_core::{FailureKind, TaskKind};

    fn sample_report() -> BatchReport {
        let mut report = BatchReport::new();
        report.push(
            "a.py",
            TaskKind::CodeReview,
            AnalysisResult::ok(Payload::Text("Looks good.".to_string())),
        );
        report.push(
            "b.py",
            TaskKind::CodeReview,
            AnalysisResult::failed(FailureKind::InvalidInput, "File not found: b.py"),
        );
        report
    }

    #[test]
    fn test_render_is_idempotent() {
        let aggregator = ReportAggregator::new();
        let report = sample_report();
        assert_eq!(aggregator.render(&report), aggregator.render(&report));
    }

    #[test]
    fn test_timestamp_is_a_single_isolated_line() {
        let aggregator = ReportAggregator::new();
        let report = sample_report();
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();

        let first = aggregator.render_with_timestamp(&report, at);
        let second = aggregator.render_with_timestamp(&report, later);
        assert_ne!(first, second);
        assert_eq!(first.lines().nth(1), Some("Generated on: 2026-10-19T08:30:00Z"));
        assert_eq!(
            ReportAggregator::strip_timestamp(&first),
            ReportAggregator::strip_timestamp(&second)
        );
        assert_eq!(ReportAggregator::strip_timestamp(&first), aggregator.render(&report));
    }

    #[test]
    fn test_strip_timestamp_keeps_body_lines_with_the_same_prefix() {
        let aggregator = ReportAggregator::new();
        let mut report = BatchReport::new();
        report.push(
            "minutes.txt",
            TaskKind::Summarize,
            AnalysisResult::ok(Payload::Text(
                "Summary\nGenerated on: the board's request\n".to_string(),
            )),
        );

        let plain = aggregator.render(&report);
        assert!(plain.contains("Generated on: the board's request"));
        assert_eq!(ReportAggregator::strip_timestamp(&plain), plain);

        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let stamped = aggregator.render_with_timestamp(&report, at);
        assert_eq!(ReportAggregator::strip_timestamp(&stamped), plain);
    }

    #[test]
    fn test_failure_section_names_stage_and_kind() {
        let rendered = ReportAggregator::new().render(&sample_report());
        assert!(rendered.contains(
            "**Failed** (validation stage, invalid input): File not found: b.py"
        ));
    }

    #[test]
    fn test_sections_follow_report_order() {
        let rendered = ReportAggregator::new().render(&sample_report());
        let a = rendered.find("## a.py").unwrap();
        let b = rendered.find("## b.py").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_mixed_tasks_get_generic_title_and_task_lines() {
        let mut report = sample_report();
        report.push(
            "note",
            TaskKind::Summarize,
            AnalysisResult::ok(Payload::Text("Short.".to_string())),
        );
        let rendered = ReportAggregator::new().render(&report);
        assert!(rendered.starts_with("# Analysis Report\n"));
        assert!(rendered.contains("_Task: Summary_"));
    }

    #[test]
    fn test_empty_report() {
        let rendered = ReportAggregator::new().render(&BatchReport::new());
        assert!(rendered.contains("Items: 0 | Succeeded: 0 | Failed: 0"));
        assert!(rendered.contains("_No items were processed._"));
    }

    #[test]
    fn test_json_report_carries_summary() {
        let json = ReportAggregator::new()
            .render_json(&sample_report(), None)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Code Review Report");
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["entries"][1]["result"]["kind"], "invalid_input");
        assert!(value.get("generated_at").is_none());
    }
}
