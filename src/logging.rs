//! Tracing subscriber setup shared by the binaries.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogMode;

/// Install the global subscriber.
///
/// Filtering follows `RUST_LOG` (default `info`). Lines go through a
/// non-blocking writer; keep the returned guard alive until exit so buffered
/// lines are flushed.
///
/// # Errors
/// Returns error if the log file cannot be opened.
pub fn init_logging(mode: LogMode, log_file: &Path) -> std::io::Result<WorkerGuard> {
    let (writer, guard) = match mode {
        LogMode::File => {
            if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;
            tracing_appender::non_blocking(file)
        }
        LogMode::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    Ok(guard)
}
