//! Settings structs, one per `[section]` of config.ini.

use crate::descriptor::TileFormat;
use std::path::PathBuf;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub pyramid: PyramidSettings,
    pub generation: GenerationSettings,
    pub logging: LoggingSettings,
}

/// Image parameters shared by every version of a pyramid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidSettings {
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Tile overlap in pixels, recorded in the descriptor
    pub overlap: u32,
    /// Tile encoding
    pub format: TileFormat,
    /// Coarsest level that gets generated
    pub min_level: u32,
}

/// Worker pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Threads generating tiles within one level
    pub threads: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
