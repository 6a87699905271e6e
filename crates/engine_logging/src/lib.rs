#![deny(missing_docs)]
//! Shared logging utilities for the sqldoc workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! the process-wide logger setup used by the CLI, and a minimal test
//! initializer for the global logger.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE: &str = "./sqldoc.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// Write to a log file.
    #[default]
    File,
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Logger settings for [`initialize`].
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Where log records go.
    pub destination: LogDestination,
    /// Maximum level that is recorded.
    pub level: LevelFilter,
    /// File used for `File` and `Both`.
    pub file_path: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: LevelFilter::Info,
            file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// Initialize the global logger.
///
/// A log file that cannot be created is reported on stderr and skipped.
/// Calling this twice is harmless; the second call is ignored.
pub fn initialize(settings: &LogSettings) {
    let config = build_config();
    let level = settings.level;

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(
        settings.destination,
        LogDestination::Terminal | LogDestination::Both
    ) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if matches!(
        settings.destination,
        LogDestination::File | LogDestination::Both
    ) {
        if let Some(file_logger) = create_file_logger(&settings.file_path, level, config) {
            loggers.push(file_logger);
        }
    }

    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LogDestination, LogSettings, DEFAULT_LOG_FILE};

    #[test]
    fn defaults_log_to_file_at_info() {
        let settings = LogSettings::default();
        assert_eq!(settings.destination, LogDestination::File);
        assert_eq!(settings.level, log::LevelFilter::Info);
        assert_eq!(settings.file_path.to_str(), Some(DEFAULT_LOG_FILE));
    }
}
