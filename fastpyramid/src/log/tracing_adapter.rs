//! Adapter from [`Logger`] to the `tracing` macros.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Forwards engine messages to whatever `tracing` subscriber is installed.
///
/// Pair it with [`crate::logging::init_logging`] to get file and stdout output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "fastpyramid", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "fastpyramid", "{}", args),
            LogLevel::Info => tracing::info!(target: "fastpyramid", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "fastpyramid", "{}", args),
            LogLevel::Error => tracing::error!(target: "fastpyramid", "{}", args),
        }
    }
}
