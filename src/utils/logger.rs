use crate::config::LoggingConfig;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable that forces debug logging to a file
pub const DEBUG_ENV: &str = "TRACKEXTRACT_DEBUG";

/// Directory holding rolling log files
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trackextract")
}

/// Initialize logging.
///
/// With `TRACKEXTRACT_DEBUG` set or `log_to_file` enabled, debug logs go to
/// a daily rolling file and the returned guard must be kept alive. Otherwise
/// logs go to stderr, filtered by `RUST_LOG` or the configured level.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Option<WorkerGuard> {
    if std::env::var(DEBUG_ENV).is_ok() || config.log_to_file {
        let log_dir = log_dir();
        let _ = std::fs::create_dir_all(&log_dir);

        let file_appender = tracing_appender::rolling::daily(&log_dir, "trackextract.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let _ = tracing_subscriber::fmt()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .try_init();

        tracing::info!("trackextract logging to {}", log_dir.display());
        Some(guard)
    } else {
        let level = if verbose { "debug" } else { config.level.as_str() };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_env_filter(filter)
            .try_init();
        None
    }
}
