//! Default values and the `ConfigFile::default()` implementation.

use super::file::config_directory;
use super::settings::*;
use crate::descriptor::TileFormat;

/// Default tile edge length. 254 + 2 × 1px overlap fits a 256px texture.
pub const DEFAULT_TILE_SIZE: u32 = 254;

pub const DEFAULT_TILE_OVERLAP: u32 = 1;

pub const DEFAULT_TILE_FORMAT: TileFormat = TileFormat::Jpeg;

/// Levels below this one are too small to be worth generating.
pub const DEFAULT_MIN_LEVEL: u32 = 3;

/// Number of available CPU cores.
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            pyramid: PyramidSettings {
                tile_size: DEFAULT_TILE_SIZE,
                overlap: DEFAULT_TILE_OVERLAP,
                format: DEFAULT_TILE_FORMAT,
                min_level: DEFAULT_MIN_LEVEL,
            },
            generation: GenerationSettings { threads: num_cpus() },
            logging: LoggingSettings {
                file: config_directory().join("fastpyramid.log"),
            },
        }
    }
}
