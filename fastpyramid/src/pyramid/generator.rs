//! Top-level pyramid handle and its worker pool.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use super::context::PyramidContext;
use super::error::{PyramidError, PyramidResult};
use super::layout::PyramidLayout;
use super::version::{Version, VersionReport};
use crate::config::GenerationConfig;
use crate::descriptor::{DeepZoomDescriptor, Descriptor, TileFormat};
use crate::log::Logger;
use crate::{log_debug, log_info};

/// A versioned image pyramid rooted at a base directory.
///
/// Source tiles for version `N` are read from `<base>/vN/`; output goes to
/// `<base>/dest/dzi/vN/`. Tiles of one level are generated in parallel on a
/// dedicated rayon pool sized by [`GenerationConfig::threads`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use fastpyramid::config::GenerationConfig;
/// use fastpyramid::descriptor::TileFormat;
/// use fastpyramid::log::TracingLogger;
/// use fastpyramid::pyramid::Pyramid;
///
/// let mut pyramid = Pyramid::deep_zoom(
///     "/data/galaxy",
///     25000,
///     16667,
///     254,
///     1,
///     TileFormat::Jpeg,
///     GenerationConfig::default(),
///     Arc::new(TracingLogger::new()),
/// )?;
/// let reports = pyramid.generate_versions(3)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Pyramid {
    ctx: Arc<PyramidContext>,
    config: GenerationConfig,
    versions: BTreeMap<u32, Version>,
    pool: ThreadPool,
}

impl Pyramid {
    /// Create a pyramid over `base_path` with any descriptor.
    pub fn new(
        base_path: impl AsRef<Path>,
        descriptor: Arc<dyn Descriptor>,
        format: TileFormat,
        config: GenerationConfig,
        logger: Arc<dyn Logger>,
    ) -> PyramidResult<Self> {
        let base_path = base_path.as_ref();
        let layout =
            PyramidLayout::new(base_path, format).map_err(|e| PyramidError::io(base_path, e))?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads())
            .thread_name(|i| format!("tile-worker-{}", i))
            .build()
            .map_err(|e| PyramidError::WorkerPool(e.to_string()))?;

        log_debug!(
            logger,
            "pyramid at {} with {} levels, {} worker threads",
            layout.base_path().display(),
            descriptor.num_levels(),
            config.threads()
        );

        Ok(Self {
            ctx: Arc::new(PyramidContext::new(descriptor, layout, logger)),
            config,
            versions: BTreeMap::new(),
            pool,
        })
    }

    /// Create a Deep Zoom pyramid for a `width × height` full-resolution
    /// image.
    #[allow(clippy::too_many_arguments)]
    pub fn deep_zoom(
        base_path: impl AsRef<Path>,
        width: u32,
        height: u32,
        tile_size: u32,
        overlap: u32,
        format: TileFormat,
        config: GenerationConfig,
        logger: Arc<dyn Logger>,
    ) -> PyramidResult<Self> {
        let descriptor = DeepZoomDescriptor::new(width, height, tile_size, overlap, format)
            .map_err(|source| PyramidError::Descriptor { version: 0, source })?;
        Self::new(base_path, Arc::new(descriptor), format, config, logger)
    }

    pub fn context(&self) -> &PyramidContext {
        &self.ctx
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn layout(&self) -> &PyramidLayout {
        self.ctx.layout()
    }

    pub fn num_levels(&self) -> u32 {
        self.ctx.num_levels()
    }

    /// Version `number`, created on first access.
    pub fn version(&mut self, number: u32) -> &mut Version {
        match self.versions.entry(number) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Version::new(self.ctx.clone(), number)),
        }
    }

    /// Generate one version. Version `N > 0` requires `N - 1` to be
    /// complete already.
    pub fn generate_version(&mut self, number: u32) -> PyramidResult<VersionReport> {
        let min_level = self.config.min_level();
        let pool = &self.pool;
        let version = match self.versions.entry(number) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Version::new(self.ctx.clone(), number)),
        };

        log_info!(self.ctx.logger(), "generating version {}", number);
        pool.install(|| version.generate(min_level))
    }

    /// Generate versions `0..count` in order. Versions completed by an
    /// earlier run are skipped level by level.
    pub fn generate_versions(&mut self, count: u32) -> PyramidResult<Vec<VersionReport>> {
        (0..count)
            .map(|number| self.generate_version(number))
            .collect()
    }

    /// Remove all generated output, leaving source tiles alone.
    pub fn clean(&mut self) -> PyramidResult<()> {
        let root = self.ctx.layout().output_root();
        self.versions.clear();
        match fs::remove_dir_all(&root) {
            Ok(()) => {
                log_info!(self.ctx.logger(), "removed {}", root.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PyramidError::io(root, e)),
        }
    }
}

impl std::fmt::Debug for Pyramid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pyramid")
            .field("ctx", &self.ctx)
            .field("config", &self.config)
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::NoOpLogger;
    use tempfile::TempDir;

    fn pyramid(base: &Path, threads: usize) -> Pyramid {
        Pyramid::deep_zoom(
            base,
            8,
            8,
            4,
            0,
            TileFormat::Png,
            GenerationConfig::default().with_min_level(0).with_threads(threads),
            Arc::new(NoOpLogger),
        )
        .unwrap()
    }

    #[test]
    fn test_pool_uses_configured_threads() {
        let temp = TempDir::new().unwrap();
        let p = pyramid(temp.path(), 3);
        assert_eq!(p.pool.current_num_threads(), 3);
        assert_eq!(p.num_levels(), 4);
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let temp = TempDir::new().unwrap();
        let result = Pyramid::deep_zoom(
            temp.path(),
            0,
            8,
            4,
            0,
            TileFormat::Png,
            GenerationConfig::default(),
            Arc::new(NoOpLogger),
        );
        assert!(matches!(result, Err(PyramidError::Descriptor { .. })));
    }

    #[test]
    fn test_version_is_cached() {
        let temp = TempDir::new().unwrap();
        let mut p = pyramid(temp.path(), 1);
        p.version(2);
        p.version(2);
        assert_eq!(p.versions.len(), 1);
        assert_eq!(p.version(2).number(), 2);
    }

    #[test]
    fn test_clean_without_output_is_ok() {
        let temp = TempDir::new().unwrap();
        let mut p = pyramid(temp.path(), 1);
        assert!(p.clean().is_ok());
    }

    #[test]
    fn test_clean_keeps_sources() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("v0")).unwrap();
        fs::create_dir_all(temp.path().join("dest/dzi/v0")).unwrap();
        let mut p = pyramid(temp.path(), 1);

        p.clean().unwrap();

        assert!(temp.path().join("v0").exists());
        assert!(!temp.path().join("dest").exists());
    }
}
