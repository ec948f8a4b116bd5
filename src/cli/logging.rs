//! Logging initialization

use std::path::PathBuf;

/// Initialize logging based on debug flag
///
/// Logs go to a temp file so they never mix with shell output. Returns the
/// log file path if debug logging is enabled.
pub fn init_logging(debug: bool) -> anyhow::Result<Option<PathBuf>> {
    if !debug {
        // Silent by default
        return Ok(None);
    }

    let (file, path) = tempfile::Builder::new()
        .prefix("rbiam-")
        .suffix(".log")
        .tempfile()?
        .keep()?;

    tracing_subscriber::fmt()
        .with_writer(file)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(Some(path))
}
