//! Descriptor errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Image parameters that cannot describe a pyramid
    #[error("Invalid descriptor parameters: {0}")]
    InvalidParameters(String),

    /// Metadata could not be written
    #[error("Failed to write descriptor to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
