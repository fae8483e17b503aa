//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a non-zero exit code.

use std::fmt;
use std::process;
use fastpyramid::config::ConfigFileError;
use fastpyramid::descriptor::DescriptorError;
use fastpyramid::pyramid::PyramidError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid option or config value
    Config(String),
    /// Failed to read or write config.ini
    ConfigFile(ConfigFileError),
    /// Invalid image geometry
    Descriptor(DescriptorError),
    /// Pyramid generation failed
    Generation(PyramidError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Generation(PyramidError::MissingPreviousVersion { missing, .. }) => {
                eprintln!();
                eprintln!(
                    "Versions are built on top of each other. Generate version {} first,",
                    missing
                );
                eprintln!("or pass --versions to generate every version from 0 in one run.");
            }
            CliError::Generation(e) if e.is_contract_violation() => {
                eprintln!();
                eprintln!("The output tree looks inconsistent. Re-run with --clean to rebuild it.");
            }
            CliError::ConfigFile(_) => {
                eprintln!();
                eprintln!("Run 'fastpyramid config init --force' to restore a default config.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration file error: {}", e),
            CliError::Descriptor(e) => write!(f, "Invalid image parameters: {}", e),
            CliError::Generation(e) => write!(f, "Generation failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Descriptor(e) => Some(e),
            CliError::Generation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<DescriptorError> for CliError {
    fn from(e: DescriptorError) -> Self {
        CliError::Descriptor(e)
    }
}

impl From<PyramidError> for CliError {
    fn from(e: PyramidError) -> Self {
        CliError::Generation(e)
    }
}
