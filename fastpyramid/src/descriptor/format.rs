//! Tile image formats.

use std::fmt;
use std::str::FromStr;

use image::ImageFormat;
use thiserror::Error;

/// Encoding of generated tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileFormat {
    Png,
    #[default]
    Jpeg,
}

impl TileFormat {
    /// File extension used in tile names (`<x>_<y>.<ext>`) and in the
    /// descriptor's `Format` attribute.
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg => "jpg",
        }
    }

    /// Codec used when encoding combined tiles.
    pub fn image_format(&self) -> ImageFormat {
        match self {
            TileFormat::Png => ImageFormat::Png,
            TileFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported tile format '{0}' (expected png or jpg)")]
pub struct ParseTileFormatError(pub String);

impl FromStr for TileFormat {
    type Err = ParseTileFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(TileFormat::Png),
            "jpg" | "jpeg" => Ok(TileFormat::Jpeg),
            other => Err(ParseTileFormatError(other.to_string())),
        }
    }
}
