// [apps/agent/src/logging.rs]
//! Structured logging: a human-readable console sink plus a rotating
//! file sink under the data directory, mirroring the split the rest of
//! the corpus uses (console for the operator, file for postmortems).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. The returned guard must be held for
/// the life of the process — dropping it stops the non-blocking file
/// writer from flushing.
pub fn init(data_path: &Path, debug: bool) -> anyhow::Result<WorkerGuard> {
    let log_dir = data_path.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "agent.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_writer)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to install tracing subscriber: {error}"))?;

    Ok(guard)
}
