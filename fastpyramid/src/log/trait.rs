//! Logger trait and formatting macros.

use std::fmt::Arguments;

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Per-tile decisions
    Trace,
    /// Diagnostic detail
    Debug,
    /// Version and level progress
    Info,
    /// Recoverable problems (e.g. an unreadable optional quadrant)
    Warn,
    /// Failures that abort generation
    Error,
}

/// Sink for engine log messages.
///
/// Implementations are shared between rayon workers, hence `Send + Sync`.
/// Only [`Logger::log`] is required; the per-level helpers forward to it.
pub trait Logger: Send + Sync {
    /// Record a message at `level`.
    fn log(&self, level: LogLevel, args: Arguments<'_>);

    fn trace(&self, args: Arguments<'_>) {
        self.log(LogLevel::Trace, args);
    }

    fn debug(&self, args: Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    fn info(&self, args: Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    fn warn(&self, args: Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }

    fn error(&self, args: Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }
}

/// Log at trace level through a [`Logger`] with `format!` syntax.
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)*) => {
        $logger.trace(format_args!($($arg)*))
    };
}

/// Log at debug level through a [`Logger`] with `format!` syntax.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(format_args!($($arg)*))
    };
}

/// Log at info level through a [`Logger`] with `format!` syntax.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(format_args!($($arg)*))
    };
}

/// Log at warn level through a [`Logger`] with `format!` syntax.
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(format_args!($($arg)*))
    };
}

/// Log at error level through a [`Logger`] with `format!` syntax.
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(format_args!($($arg)*))
    };
}
