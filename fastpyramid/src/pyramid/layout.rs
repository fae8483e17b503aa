//! Filesystem layout of a pyramid.
//!
//! ```text
//! <base>/v<N>/<x>_<y>.<ext>                              source tiles (input)
//! <base>/dest/dzi/v<N>/dzi.xml                           descriptor
//! <base>/dest/dzi/v<N>/dzi_files/<level>/<x>_<y>.<ext>   generated tiles
//! ```

use std::io;
use std::path::{Path, PathBuf};

use crate::descriptor::TileFormat;

/// Name of the marker written once a level or version is complete.
pub const COMPLETION_MARKER: &str = ".complete";

/// Computes every path of a pyramid from its base directory.
///
/// The base is made absolute at construction, so symlink targets written
/// into the tree are absolute too.
///
/// # Example
///
/// ```
/// use fastpyramid::descriptor::TileFormat;
/// use fastpyramid::pyramid::PyramidLayout;
/// use std::path::Path;
///
/// let layout = PyramidLayout::new("/data/galaxy", TileFormat::Png).unwrap();
/// assert_eq!(
///     layout.tile_path(2, 11, 3, 4),
///     Path::new("/data/galaxy/dest/dzi/v2/dzi_files/11/3_4.png")
/// );
/// assert_eq!(layout.source_tile_path(2, 3, 4), Path::new("/data/galaxy/v2/3_4.png"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidLayout {
    base: PathBuf,
    format: TileFormat,
}

impl PyramidLayout {
    /// Create a layout rooted at `base`, resolving relative paths against
    /// the current directory.
    pub fn new(base: impl AsRef<Path>, format: TileFormat) -> io::Result<Self> {
        Ok(Self {
            base: std::path::absolute(base.as_ref())?,
            format,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base
    }

    pub fn format(&self) -> TileFormat {
        self.format
    }

    /// Root of all generated output (`<base>/dest`).
    pub fn output_root(&self) -> PathBuf {
        self.base.join("dest")
    }

    /// Destination root of one version.
    pub fn version_dir(&self, version: u32) -> PathBuf {
        self.output_root().join("dzi").join(format!("v{}", version))
    }

    pub fn descriptor_path(&self, version: u32) -> PathBuf {
        self.version_dir(version).join("dzi.xml")
    }

    pub fn level_dir(&self, version: u32, level: u32) -> PathBuf {
        self.version_dir(version)
            .join("dzi_files")
            .join(level.to_string())
    }

    /// `<x>_<y>.<ext>`
    pub fn tile_file_name(&self, x: u32, y: u32) -> String {
        format!("{}_{}.{}", x, y, self.format.extension())
    }

    pub fn tile_path(&self, version: u32, level: u32, x: u32, y: u32) -> PathBuf {
        self.level_dir(version, level).join(self.tile_file_name(x, y))
    }

    /// Directory where users drop full-resolution tiles for a version.
    pub fn source_dir(&self, version: u32) -> PathBuf {
        self.base.join(format!("v{}", version))
    }

    pub fn source_tile_path(&self, version: u32, x: u32, y: u32) -> PathBuf {
        self.source_dir(version).join(self.tile_file_name(x, y))
    }

    pub fn level_marker(&self, version: u32, level: u32) -> PathBuf {
        self.level_dir(version, level).join(COMPLETION_MARKER)
    }

    pub fn version_marker(&self, version: u32) -> PathBuf {
        self.version_dir(version).join(COMPLETION_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PyramidLayout {
        PyramidLayout::new("/pyr", TileFormat::Jpeg).unwrap()
    }

    #[test]
    fn test_version_paths() {
        let layout = layout();
        assert_eq!(layout.output_root(), PathBuf::from("/pyr/dest"));
        assert_eq!(layout.version_dir(0), PathBuf::from("/pyr/dest/dzi/v0"));
        assert_eq!(
            layout.descriptor_path(3),
            PathBuf::from("/pyr/dest/dzi/v3/dzi.xml")
        );
        assert_eq!(layout.source_dir(3), PathBuf::from("/pyr/v3"));
    }

    #[test]
    fn test_tile_paths_use_format_extension() {
        let layout = layout();
        assert_eq!(layout.tile_file_name(10, 2), "10_2.jpg");
        assert_eq!(
            layout.tile_path(1, 12, 10, 2),
            PathBuf::from("/pyr/dest/dzi/v1/dzi_files/12/10_2.jpg")
        );
    }

    #[test]
    fn test_markers() {
        let layout = layout();
        assert_eq!(
            layout.level_marker(0, 5),
            PathBuf::from("/pyr/dest/dzi/v0/dzi_files/5/.complete")
        );
        assert_eq!(
            layout.version_marker(0),
            PathBuf::from("/pyr/dest/dzi/v0/.complete")
        );
    }

    #[test]
    fn test_relative_base_becomes_absolute() {
        let layout = PyramidLayout::new("sandbox/pyramid", TileFormat::Png).unwrap();
        assert!(layout.base_path().is_absolute());
        assert!(layout.base_path().ends_with("sandbox/pyramid"));
    }
}
