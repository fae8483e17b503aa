//! Common types shared across CLI commands.

use clap::ValueEnum;
use fastpyramid::descriptor::TileFormat;

/// Tile encoding selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Lossless PNG tiles
    Png,
    /// JPEG tiles (smaller, the Deep Zoom default)
    #[value(alias = "jpeg")]
    Jpg,
}

impl From<FormatArg> for TileFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Png => TileFormat::Png,
            FormatArg::Jpg => TileFormat::Jpeg,
        }
    }
}
