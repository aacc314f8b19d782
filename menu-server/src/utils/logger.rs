//! Logging Infrastructure
//!
//! Console output by default; with a log directory, output goes to a daily
//! rolling file instead.

use std::path::Path;

/// Initialize the logger with console output at `info`
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
///
/// A `log_dir` that does not exist is created; if that fails the logger
/// falls back to the console.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, "menu-server");
            subscriber.with_ansi(false).with_writer(file_appender).init();
            return;
        }
        eprintln!("Cannot create log directory {dir}, logging to console");
    }

    subscriber.init();
}
