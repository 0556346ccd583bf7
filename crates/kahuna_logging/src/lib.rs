#![deny(missing_docs)]
//! Shared logging utilities for the kahuna workspace.
//!
//! This crate provides the `kahuna_*` logging macros used across the codebase,
//! the global logger setup for embedding hosts and a minimal test initializer.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Mixed stdout/stderr terminal output.
    Terminal,
    /// A log file, truncated on startup.
    File(PathBuf),
}

/// Installs the global logger writing to every target in `targets`.
///
/// Returns `false` when no target could be opened or a logger is already
/// installed. Unopenable files are reported on stderr and skipped.
pub fn initialize(targets: &[LogTarget], level: LevelFilter) -> bool {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::with_capacity(targets.len());
    for target in targets {
        match target {
            LogTarget::Terminal => loggers.push(TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )),
            LogTarget::File(path) => match File::create(path) {
                Ok(file) => loggers.push(WriteLogger::new(level, config.clone(), file)),
                Err(err) => eprintln!("Warning: could not create log file {:?}: {}", path, err),
            },
        }
    }

    !loggers.is_empty() && CombinedLogger::init(loggers).is_ok()
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! kahuna_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! kahuna_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! kahuna_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! kahuna_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! kahuna_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized, so every
/// test may call it.
pub fn initialize_for_tests() {
    // Debug builds trace the stream controller; release builds stay at info.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
