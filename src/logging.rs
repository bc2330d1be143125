//! Structured logging bootstrap using `tracing`.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global tracing subscriber with sensible defaults.
///
/// Events go to stderr so command output on stdout stays machine-readable.
/// `LOG_FORMAT=json` emits one JSON object per event, anything else the
/// human-readable formatter.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let timer = fmt::time::UtcTime::rfc_3339();

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_timer(timer)
            .with_target(true)
            .with_current_span(true)
            .with_filter(env_filter);
        tracing_subscriber::registry().with(fmt_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(timer)
            .with_level(true)
            .with_line_number(true)
            .with_file(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_filter(env_filter);
        tracing_subscriber::registry().with(fmt_layer).init();
    }

    tracing::debug!(level = ?Level::INFO, "tracing initialised");
    Ok(())
}
