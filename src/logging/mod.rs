//! Application logging system
//!
//! Structured log lines on stderr (colored) and in a per-session log file under
//! the application's cache directory. Use the `log_*!` macros with a module tag.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::config;
use crate::utils::get_cache_dir;

/// Number of session log files kept on disk
const KEEP_LOG_FILES: usize = 10;

/// Log levels for categorizing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Parse a level name as sent by the frontend; unknown names map to `Info`
    pub fn parse(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => LogLevel::Debug,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    fn color(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[35m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }
}

struct Logger {
    min_level: LogLevel,
    log_file: Option<File>,
    log_path: Option<PathBuf>,
}

impl Logger {
    fn new() -> Self {
        let (log_file, log_path) = Self::create_log_file();
        Self {
            min_level: LogLevel::Info,
            log_file,
            log_path,
        }
    }

    fn create_log_file() -> (Option<File>, Option<PathBuf>) {
        let log_dir = get_log_dir();

        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create log directory: {}", e);
            return (None, None);
        }

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("{}_{}.log", config::app::NAME, timestamp));

        match OpenOptions::new().create(true).append(true).open(&log_path) {
            Ok(file) => (Some(file), Some(log_path)),
            Err(e) => {
                eprintln!("Failed to create log file: {}", e);
                (None, None)
            }
        }
    }

    fn log(&mut self, level: LogLevel, module: &str, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Local::now();
        eprintln!("{}", format_colored(level, module, message, &timestamp));

        if let Some(ref mut file) = self.log_file {
            let _ = writeln!(file, "{}", format_plain(level, module, message, &timestamp));
            let _ = file.flush();
        }
    }
}

fn format_colored(level: LogLevel, module: &str, message: &str, ts: &DateTime<Local>) -> String {
    let reset = "\x1b[0m";
    let dim = "\x1b[90m";
    let color = level.color();

    format!(
        "{dim}{} {color}●{reset} {color}{module}:{reset} {message}",
        ts.format("%H:%M:%S")
    )
}

fn format_plain(level: LogLevel, module: &str, message: &str, ts: &DateTime<Local>) -> String {
    format!(
        "[{}] [{}] [{}] {}",
        ts.format("%Y-%m-%d %H:%M:%S%.3f"),
        level.as_str(),
        module,
        message
    )
}

/// Global logger instance
static LOGGER: Lazy<Mutex<Logger>> = Lazy::new(|| Mutex::new(Logger::new()));

/// Get the log directory path
pub fn get_log_dir() -> PathBuf {
    get_cache_dir(config::app::NAME).join("logs")
}

/// Get the current log file path (if any)
pub fn get_current_log_path() -> Option<PathBuf> {
    LOGGER.lock().ok()?.log_path.clone()
}

/// Enable or disable debug output
pub fn set_log_level(debug: bool) {
    if let Ok(mut logger) = LOGGER.lock() {
        logger.min_level = if debug { LogLevel::Debug } else { LogLevel::Info };
    }
}

/// Log a message at an explicit level
pub fn log(level: LogLevel, module: &str, message: &str) {
    if let Ok(mut logger) = LOGGER.lock() {
        logger.log(level, module, message);
    }
}

pub fn debug(module: &str, message: &str) {
    log(LogLevel::Debug, module, message);
}

pub fn info(module: &str, message: &str) {
    log(LogLevel::Info, module, message);
}

pub fn warn(module: &str, message: &str) {
    log(LogLevel::Warn, module, message);
}

pub fn error(module: &str, message: &str) {
    log(LogLevel::Error, module, message);
}

/// Log a message with format arguments (debug level)
#[macro_export]
macro_rules! log_debug {
    ($module:expr, $($arg:tt)*) => {
        $crate::logging::debug($module, &format!($($arg)*))
    };
}

/// Log a message with format arguments (info level)
#[macro_export]
macro_rules! log_info {
    ($module:expr, $($arg:tt)*) => {
        $crate::logging::info($module, &format!($($arg)*))
    };
}

/// Log a message with format arguments (warn level)
#[macro_export]
macro_rules! log_warn {
    ($module:expr, $($arg:tt)*) => {
        $crate::logging::warn($module, &format!($($arg)*))
    };
}

/// Log a message with format arguments (error level)
#[macro_export]
macro_rules! log_error {
    ($module:expr, $($arg:tt)*) => {
        $crate::logging::error($module, &format!($($arg)*))
    };
}

/// Clean up old log files, keeping only the most recent ones
pub fn cleanup_old_logs(keep_count: usize) -> Result<usize, String> {
    let log_dir = get_log_dir();

    if !log_dir.exists() {
        return Ok(0);
    }

    let mut log_files: Vec<_> = fs::read_dir(&log_dir)
        .map_err(|e| format!("Failed to read log directory: {}", e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "log"))
        .collect();

    // Newest first
    log_files.sort_by(|a, b| {
        let a_time = a.metadata().and_then(|m| m.modified()).ok();
        let b_time = b.metadata().and_then(|m| m.modified()).ok();
        b_time.cmp(&a_time)
    });

    let mut deleted = 0;
    for entry in log_files.into_iter().skip(keep_count) {
        if fs::remove_file(entry.path()).is_ok() {
            deleted += 1;
        }
    }

    Ok(deleted)
}

/// Initialize the logger (call at application startup)
pub fn init() {
    drop(LOGGER.lock());

    info("logger", &format!("{} logging initialized", config::app::DISPLAY_NAME));

    if let Some(path) = get_current_log_path() {
        info("logger", &format!("Log file: {}", path.display()));
    }

    match cleanup_old_logs(KEEP_LOG_FILES) {
        Ok(deleted) if deleted > 0 => {
            info("logger", &format!("Cleaned up {} old log files", deleted));
        }
        Err(e) => {
            warn("logger", &format!("Failed to cleanup old logs: {}", e));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(LogLevel::parse("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::parse(" error "), LogLevel::Error);
        assert_eq!(LogLevel::parse("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Info);
    }

    #[test]
    fn test_log_dir() {
        let log_dir = get_log_dir();
        assert!(log_dir.to_string_lossy().contains("apex-arcade"));
        assert!(log_dir.to_string_lossy().contains("logs"));
    }

    #[test]
    fn test_plain_format() {
        let ts = Local::now();
        let line = format_plain(LogLevel::Warn, "probe", "all mirrors failed", &ts);
        assert!(line.contains("[WARN] [probe] all mirrors failed"));
    }
}
