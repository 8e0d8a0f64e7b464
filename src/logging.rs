//! Logging setup and the `(level, message)` forwarding sink
//!
//! Log lines from the frontend console arrive as a level plus a message and
//! are re-emitted as `tracing` events. Forwarding never fails and never
//! blocks state mutation; without a subscriber the events are dropped.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const FORWARD_TARGET: &str = "noot::console";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Map a console method name to a level. `log` is the noisiest and maps to trace.
    pub fn from_console_method(method: &str) -> Option<Self> {
        match method {
            "log" | "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Forward one line to the log. Fire-and-forget.
pub fn forward(level: LogLevel, message: &str) {
    match level {
        LogLevel::Trace => tracing::trace!(target: FORWARD_TARGET, "{}", message),
        LogLevel::Debug => tracing::debug!(target: FORWARD_TARGET, "{}", message),
        LogLevel::Info => tracing::info!(target: FORWARD_TARGET, "{}", message),
        LogLevel::Warn => tracing::warn!(target: FORWARD_TARGET, "{}", message),
        LogLevel::Error => tracing::error!(target: FORWARD_TARGET, "{}", message),
    }
}

/// Keeps the background log writer alive; drop it to flush
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Install the global subscriber writing to a daily rolling file.
///
/// Returns None if the directory can't be created or a subscriber is
/// already installed; the application runs on without file logging.
pub fn init(filter: &str, log_dir: &Path) -> Option<LoggingGuard> {
    let log_dir = std::fs::create_dir_all(log_dir)
        .map(|_| log_dir.to_path_buf())
        .or_else(|_| -> std::io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("noot").join("logs");
            std::fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "noot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard { _guard: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_method_mapping() {
        assert_eq!(LogLevel::from_console_method("log"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_console_method("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_console_method("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_console_method("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_console_method("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_console_method("table"), None);
    }

    #[test]
    fn test_forward_without_subscriber_is_harmless() {
        forward(LogLevel::Error, "nobody is listening");
    }
}
