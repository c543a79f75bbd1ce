//! Tracing initialization.

use tracing_subscriber::EnvFilter;

/// Install the process-wide tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` for the
/// Scribe crates and `warn` for everything else. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,scribe=debug,scribe_core=debug,scribe_openai=debug,scribe_pipeline=debug,scribe_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
