use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "postedit.log";
pub const LOG_ENV: &str = "PE_LOG";

/// Send tracing output to `<data_dir>/postedit.log`; the terminal belongs
/// to the UI. The filter comes from `$PE_LOG`, then `$RUST_LOG`, then
/// `info`. Keep the returned guard alive until exit so buffered lines are
/// flushed.
pub fn init(data_dir: &Path) -> Option<WorkerGuard> {
    if std::fs::create_dir_all(data_dir).is_err() {
        return None;
    }
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        // A subscriber is already installed
        Err(_) => None,
    }
}
