//! Configuration for pyramid generation.
//!
//! Settings come from `~/.fastpyramid/config.ini` (see [`ConfigFile`]);
//! the engine itself only sees the small [`GenerationConfig`] value object.
//!
//! ```
//! use fastpyramid::config::GenerationConfig;
//!
//! let config = GenerationConfig::default().with_min_level(0).with_threads(2);
//! assert_eq!(config.min_level(), 0);
//! assert_eq!(config.threads(), 2);
//! ```

mod defaults;
mod file;
mod generation;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    num_cpus, DEFAULT_MIN_LEVEL, DEFAULT_TILE_FORMAT, DEFAULT_TILE_OVERLAP, DEFAULT_TILE_SIZE,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use generation::GenerationConfig;
pub use settings::{ConfigFile, GenerationSettings, LoggingSettings, PyramidSettings};
