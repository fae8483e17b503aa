//! Pyramid descriptor: level count, tile grids and on-disk metadata.
//!
//! The engine only relies on the [`Descriptor`] trait. [`DeepZoomDescriptor`]
//! is the concrete Deep Zoom (DZI) implementation used by the CLI and tests.
//!
//! ```
//! use fastpyramid::descriptor::{DeepZoomDescriptor, Descriptor, TileFormat};
//!
//! let descriptor = DeepZoomDescriptor::new(1480, 940, 254, 1, TileFormat::Png).unwrap();
//! assert_eq!(descriptor.num_levels(), 12);
//! assert_eq!(descriptor.num_tiles(11).columns, 6);
//! assert_eq!(descriptor.num_tiles(11).rows, 4);
//! ```

mod deepzoom;
mod error;
mod format;

pub use deepzoom::{DeepZoomDescriptor, DZI_NAMESPACE};
pub use error::DescriptorError;
pub use format::{ParseTileFormatError, TileFormat};

use std::path::Path;

/// Tile grid dimensions of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileGrid {
    /// Number of tile columns (x range is `0..columns`)
    pub columns: u32,
    /// Number of tile rows (y range is `0..rows`)
    pub rows: u32,
}

impl TileGrid {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.columns && y < self.rows
    }

    /// Total number of tiles.
    pub fn len(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    /// All coordinates, column-major like the generator walks them.
    pub fn coordinates(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.columns).flat_map(move |x| (0..self.rows).map(move |y| (x, y)))
    }
}

/// Geometry and persistence contract of a multi-resolution image.
///
/// Must be a deterministic function of the image parameters: every version
/// of a pyramid shares one descriptor.
pub trait Descriptor: Send + Sync {
    /// Number of levels; level `num_levels() - 1` is full resolution.
    fn num_levels(&self) -> u32;

    /// Tile grid of `level`. Callers guarantee `level < num_levels()`.
    fn num_tiles(&self, level: u32) -> TileGrid;

    /// Persist the descriptor metadata at `path`.
    fn save(&self, path: &Path) -> Result<(), DescriptorError>;

    /// Index of the finest level.
    fn max_level(&self) -> u32 {
        self.num_levels().saturating_sub(1)
    }
}
