//! Terminal adapter for Scribe
//!
//! Collects inputs from the command line, shows progress, and writes the
//! finished report. All pipeline logic lives in `scribe-pipeline`.

mod inputs;
mod logging;
mod output;
mod ui;

pub use inputs::{InputSet, read_stdin};
pub use logging::init_logging;
pub use output::{
    EXIT_FATAL, EXIT_ITEM_FAILURES, EXIT_OK, ReportFormat, exit_code_for, exit_status_for,
    render_report, write_report,
};
pub use ui::{display_banner, print_fatal, print_progress, print_saved, print_summary, progress_line};

// Re-export core types
pub use scribe_core::{Error, Result};
