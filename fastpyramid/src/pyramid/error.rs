//! Errors raised while generating a pyramid.
//!
//! The first group are contract violations: they mean the caller walked the
//! pyramid in an order the engine does not support. They abort generation
//! and are never retried.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::combine::CombineError;
use crate::descriptor::DescriptorError;

/// Convenience alias for engine results.
pub type PyramidResult<T> = Result<T, PyramidError>;

#[derive(Debug, Error)]
pub enum PyramidError {
    #[error(
        "Tile ({x}, {y}) is outside the {columns}x{rows} grid of level {level} in version {version}"
    )]
    TileOutOfBounds {
        version: u32,
        level: u32,
        x: u32,
        y: u32,
        columns: u32,
        rows: u32,
    },

    #[error("Level {level} is the max level and has no parent tiles")]
    MaxLevelHasNoParents { level: u32 },

    #[error("Level {level} is not the max level ({max_level}); only max-level tiles have source images")]
    NotMaxLevel { level: u32, max_level: u32 },

    #[error("Tile {path} has not been generated yet")]
    NotGenerated { path: PathBuf },

    #[error("Level {level} does not exist; the pyramid has {num_levels} levels")]
    LevelOutOfRange { level: u32, num_levels: u32 },

    #[error("Version {version} cannot be generated before version {missing} is complete")]
    MissingPreviousVersion { version: u32, missing: u32 },

    /// Combining parent tiles failed (e.g. the top-left parent is unreadable)
    #[error("Failed to combine tile {x}_{y} at level {level} of version {version}: {source}")]
    Combine {
        version: u32,
        level: u32,
        x: u32,
        y: u32,
        #[source]
        source: CombineError,
    },

    #[error("Failed to link {link} -> {target}: {source}")]
    Link {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write descriptor for version {version}: {source}")]
    Descriptor {
        version: u32,
        #[source]
        source: DescriptorError,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start tile worker pool: {0}")]
    WorkerPool(String),
}

impl PyramidError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PyramidError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a traversal-order or bounds violation rather
    /// than an environmental failure.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            PyramidError::TileOutOfBounds { .. }
                | PyramidError::MaxLevelHasNoParents { .. }
                | PyramidError::NotMaxLevel { .. }
                | PyramidError::NotGenerated { .. }
                | PyramidError::LevelOutOfRange { .. }
                | PyramidError::MissingPreviousVersion { .. }
        )
    }
}
