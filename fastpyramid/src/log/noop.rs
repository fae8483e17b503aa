//! Logger that discards everything.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Silent logger for library users that do their own reporting.
///
/// ```
/// use fastpyramid::log::{Logger, NoOpLogger};
///
/// NoOpLogger.info(format_args!("dropped"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline]
    fn log(&self, _level: LogLevel, _args: Arguments<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoOpLogger>();
    }

    #[test]
    fn test_noop_logger_accepts_every_level() {
        let logger: Box<dyn Logger> = Box::new(NoOpLogger);
        logger.trace(format_args!("trace"));
        logger.info(format_args!("info"));
        logger.error(format_args!("error"));
    }
}
