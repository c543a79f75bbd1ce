//! Report output and exit-code policy

use chrono::Utc;
use clap::ValueEnum;
use std::path::Path;
use std::process::ExitCode;

use scribe_core::{BatchReport, Result};
use scribe_pipeline::ReportAggregator;

/// Every entry succeeded
pub const EXIT_OK: u8 = 0;
/// The batch ran but at least one entry failed
pub const EXIT_ITEM_FAILURES: u8 = 1;
/// Nothing ran: bad configuration or unusable arguments
pub const EXIT_FATAL: u8 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

/// Render the report in the requested format
pub fn render_report(report: &BatchReport, format: ReportFormat, timestamp: bool) -> Result<String> {
    let aggregator = ReportAggregator::new();
    let generated_at = timestamp.then(Utc::now);

    match format {
        ReportFormat::Markdown => Ok(match generated_at {
            Some(at) => aggregator.render_with_timestamp(report, at),
            None => aggregator.render(report),
        }),
        ReportFormat::Json => aggregator.render_json(report, generated_at),
    }
}

/// Write a rendered report, creating parent directories as needed
pub async fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    Ok(())
}

/// Exit status for a finished batch: non-zero as soon as any entry failed
pub fn exit_status_for(report: &BatchReport) -> u8 {
    if report.is_fully_ok() { EXIT_OK } else { EXIT_ITEM_FAILURES }
}

pub fn exit_code_for(report: &BatchReport) -> ExitCode {
    ExitCode::from(exit_status_for(report))
}
