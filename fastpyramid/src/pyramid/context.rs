//! Pyramid-wide state shared by every version, level and tile.

use std::sync::Arc;

use super::error::{PyramidError, PyramidResult};
use super::layout::PyramidLayout;
use crate::descriptor::{Descriptor, TileFormat, TileGrid};
use crate::log::Logger;

/// Immutable parameters of one pyramid.
///
/// Versions and levels hold an `Arc` to this; tiles borrow it. Nothing in
/// here changes during generation, so it is shared freely between workers.
pub struct PyramidContext {
    descriptor: Arc<dyn Descriptor>,
    layout: PyramidLayout,
    logger: Arc<dyn Logger>,
}

impl PyramidContext {
    pub fn new(
        descriptor: Arc<dyn Descriptor>,
        layout: PyramidLayout,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            descriptor,
            layout,
            logger,
        }
    }

    pub fn descriptor(&self) -> &dyn Descriptor {
        self.descriptor.as_ref()
    }

    pub fn layout(&self) -> &PyramidLayout {
        &self.layout
    }

    pub fn format(&self) -> TileFormat {
        self.layout.format()
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    pub fn num_levels(&self) -> u32 {
        self.descriptor.num_levels()
    }

    pub fn max_level(&self) -> u32 {
        self.descriptor.max_level()
    }

    pub fn is_max_level(&self, level: u32) -> bool {
        level == self.max_level()
    }

    /// Tile grid of `level`, rejecting levels the descriptor does not have.
    pub fn grid(&self, level: u32) -> PyramidResult<TileGrid> {
        if level >= self.num_levels() {
            return Err(PyramidError::LevelOutOfRange {
                level,
                num_levels: self.num_levels(),
            });
        }
        Ok(self.descriptor.num_tiles(level))
    }
}

impl std::fmt::Debug for PyramidContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PyramidContext")
            .field("num_levels", &self.num_levels())
            .field("layout", &self.layout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DeepZoomDescriptor;
    use crate::log::NoOpLogger;

    fn context() -> PyramidContext {
        let descriptor = DeepZoomDescriptor::new(8, 8, 4, 0, TileFormat::Png).unwrap();
        PyramidContext::new(
            Arc::new(descriptor),
            PyramidLayout::new("/p", TileFormat::Png).unwrap(),
            Arc::new(NoOpLogger),
        )
    }

    #[test]
    fn test_levels() {
        let ctx = context();
        assert_eq!(ctx.num_levels(), 4);
        assert_eq!(ctx.max_level(), 3);
        assert!(ctx.is_max_level(3));
        assert!(!ctx.is_max_level(2));
    }

    #[test]
    fn test_grid_rejects_missing_level() {
        let ctx = context();
        assert_eq!(ctx.grid(3).unwrap(), TileGrid::new(2, 2));
        assert!(matches!(
            ctx.grid(4),
            Err(PyramidError::LevelOutOfRange {
                level: 4,
                num_levels: 4
            })
        ));
    }
}
