//! CLI runner for common setup.
//!
//! Encapsulates config loading and logging initialization so command
//! handlers only deal with their own work.

use std::path::Path;
use std::sync::Arc;

use fastpyramid::config::{config_file_path, ConfigFile};
use fastpyramid::log::{Logger, TracingLogger};
use fastpyramid::logging::{default_log_file, init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Alternative config.ini; the default location otherwise
    /// * `verbose` - Log at debug level and mirror log lines to stdout
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let log_path = &config.logging.file;
        let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| default_log_file().to_string());

        let logging_guard = init_logging(log_dir, &log_file, verbose, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        info!(
            "Loaded configuration from {}",
            config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(config_file_path)
                .display()
        );

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("FastPyramid v{}", fastpyramid::VERSION);
        info!("FastPyramid CLI: {} command", command);
    }

    /// Logger that forwards engine messages to `tracing`.
    pub fn logger(&self) -> Arc<dyn Logger> {
        Arc::new(TracingLogger::new())
    }
}
