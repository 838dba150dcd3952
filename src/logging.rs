use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "TYPESPEED_LOG";
pub const LOG_FILE: &str = "typespeed.log";

/// Route `tracing` output to `<dir>/typespeed.log`; the terminal belongs to the TUI.
///
/// The returned guard flushes buffered lines on drop and must outlive the app.
/// Returns `None` if the directory cannot be created or a subscriber is already set.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    fs::create_dir_all(dir).ok()?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .ok()?;

    Some(guard)
}
