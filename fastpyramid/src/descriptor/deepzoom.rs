//! Deep Zoom (DZI) descriptor.

use std::fs;
use std::path::Path;

use super::{Descriptor, DescriptorError, TileFormat, TileGrid};

/// XML namespace of the DZI schema.
pub const DZI_NAMESPACE: &str = "http://schemas.microsoft.com/deepzoom/2008";

/// Deep Zoom geometry for a `width × height` image.
///
/// Level `L` has dimensions `ceil(width / 2^(max_level - L))` by
/// `ceil(height / 2^(max_level - L))`, cut into `tile_size` squares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepZoomDescriptor {
    width: u32,
    height: u32,
    tile_size: u32,
    tile_overlap: u32,
    tile_format: TileFormat,
    num_levels: u32,
}

impl DeepZoomDescriptor {
    /// Create a descriptor.
    ///
    /// # Errors
    ///
    /// Rejects zero width, height or tile size.
    pub fn new(
        width: u32,
        height: u32,
        tile_size: u32,
        tile_overlap: u32,
        tile_format: TileFormat,
    ) -> Result<Self, DescriptorError> {
        if width == 0 || height == 0 {
            return Err(DescriptorError::InvalidParameters(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if tile_size == 0 {
            return Err(DescriptorError::InvalidParameters(
                "tile size must be positive".to_string(),
            ));
        }

        let max_dimension = u64::from(width.max(height));
        let num_levels = max_dimension.next_power_of_two().trailing_zeros() + 1;

        Ok(Self {
            width,
            height,
            tile_size,
            tile_overlap,
            tile_format,
            num_levels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn tile_overlap(&self) -> u32 {
        self.tile_overlap
    }

    pub fn tile_format(&self) -> TileFormat {
        self.tile_format
    }

    /// Pixel dimensions of `level`.
    pub fn dimensions(&self, level: u32) -> (u32, u32) {
        let shift = self.max_level().saturating_sub(level);
        (
            ceil_shift(self.width, shift),
            ceil_shift(self.height, shift),
        )
    }

    /// DZI XML document for this descriptor.
    pub fn to_xml(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Image TileSize=\"{}\" Overlap=\"{}\" Format=\"{}\" xmlns=\"{}\">\
             <Size Width=\"{}\" Height=\"{}\"/></Image>\n",
            self.tile_size,
            self.tile_overlap,
            self.tile_format.extension(),
            DZI_NAMESPACE,
            self.width,
            self.height
        )
    }
}

impl Descriptor for DeepZoomDescriptor {
    fn num_levels(&self) -> u32 {
        self.num_levels
    }

    fn num_tiles(&self, level: u32) -> TileGrid {
        let (width, height) = self.dimensions(level);
        TileGrid::new(
            width.div_ceil(self.tile_size),
            height.div_ceil(self.tile_size),
        )
    }

    fn save(&self, path: &Path) -> Result<(), DescriptorError> {
        let write_err = |source| DescriptorError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, self.to_xml()).map_err(write_err)
    }
}

/// `ceil(value / 2^shift)` without overflow.
fn ceil_shift(value: u32, shift: u32) -> u32 {
    if shift >= 32 {
        return u32::from(value > 0);
    }
    let divisor = 1u64 << shift;
    (u64::from(value).div_ceil(divisor)) as u32
}
