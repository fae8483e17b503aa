//! One version of a pyramid.

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

use super::context::PyramidContext;
use super::error::{PyramidError, PyramidResult};
use super::level::{Level, LevelStats};
use crate::log_info;

/// Result of generating one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport {
    pub version: u32,
    /// Per-level stats, finest level first
    pub levels: Vec<(u32, LevelStats)>,
}

impl VersionReport {
    /// Stats summed over every level.
    pub fn totals(&self) -> LevelStats {
        let mut totals = LevelStats {
            skipped: !self.levels.is_empty(),
            ..LevelStats::default()
        };
        for (_, stats) in &self.levels {
            totals += *stats;
        }
        totals
    }
}

/// A version and the levels touched so far.
///
/// Version `N > 0` reuses version `N - 1` wherever no new source tile
/// changed the content, so it can only be generated once `N - 1` is
/// complete.
#[derive(Debug)]
pub struct Version {
    ctx: Arc<PyramidContext>,
    number: u32,
    levels: BTreeMap<u32, Level>,
}

impl Version {
    pub(crate) fn new(ctx: Arc<PyramidContext>, number: u32) -> Self {
        Self {
            ctx,
            number,
            levels: BTreeMap::new(),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn previous_version_number(&self) -> Option<u32> {
        self.number.checked_sub(1)
    }

    /// Level `number`, created on first access.
    pub fn level(&mut self, number: u32) -> PyramidResult<&Level> {
        if !self.levels.contains_key(&number) {
            let level = Level::new(self.ctx.clone(), self.number, number)?;
            self.levels.insert(number, level);
        }
        self.levels
            .get(&number)
            .ok_or(PyramidError::LevelOutOfRange {
                level: number,
                num_levels: self.ctx.num_levels(),
            })
    }

    /// Whether every level down to the minimum finished on a past run.
    pub fn is_complete(&self) -> bool {
        self.ctx.layout().version_marker(self.number).exists()
    }

    /// Write the descriptor and generate levels from the max level down to
    /// `min_level`, one level at a time.
    ///
    /// Call from inside the rayon pool that should run the tiles.
    pub fn generate(&mut self, min_level: u32) -> PyramidResult<VersionReport> {
        if let Some(previous) = self.previous_version_number() {
            if !self.ctx.layout().version_marker(previous).exists() {
                return Err(PyramidError::MissingPreviousVersion {
                    version: self.number,
                    missing: previous,
                });
            }
        }

        let dir = self.ctx.layout().version_dir(self.number);
        fs::create_dir_all(&dir).map_err(|e| PyramidError::io(&dir, e))?;

        let descriptor_path = self.ctx.layout().descriptor_path(self.number);
        if !descriptor_path.exists() {
            self.ctx
                .descriptor()
                .save(&descriptor_path)
                .map_err(|source| PyramidError::Descriptor {
                    version: self.number,
                    source,
                })?;
        }

        let mut report = VersionReport {
            version: self.number,
            levels: Vec::new(),
        };
        for number in (min_level..self.ctx.num_levels()).rev() {
            let stats = self.level(number)?.generate()?;
            report.levels.push((number, stats));
        }

        let marker = self.ctx.layout().version_marker(self.number);
        fs::write(&marker, b"").map_err(|e| PyramidError::io(&marker, e))?;

        let totals = report.totals();
        log_info!(
            self.ctx.logger(),
            "version {} complete: {} tiles combined, {} linked",
            self.number,
            totals.combined,
            totals.linked_to_source + totals.linked_to_previous
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DeepZoomDescriptor, TileFormat};
    use crate::log::NoOpLogger;
    use crate::pyramid::PyramidLayout;
    use std::path::Path;
    use tempfile::TempDir;

    fn context(base: &Path) -> Arc<PyramidContext> {
        let descriptor = DeepZoomDescriptor::new(8, 8, 4, 0, TileFormat::Png).unwrap();
        Arc::new(PyramidContext::new(
            Arc::new(descriptor),
            PyramidLayout::new(base, TileFormat::Png).unwrap(),
            Arc::new(NoOpLogger),
        ))
    }

    #[test]
    fn test_requires_previous_version() {
        let temp = TempDir::new().unwrap();
        let mut version = Version::new(context(temp.path()), 2);

        let err = version.generate(0).unwrap_err();
        assert!(matches!(
            err,
            PyramidError::MissingPreviousVersion {
                version: 2,
                missing: 1
            }
        ));
        assert!(!temp.path().join("dest").exists());
    }

    #[test]
    fn test_level_out_of_range() {
        let temp = TempDir::new().unwrap();
        let mut version = Version::new(context(temp.path()), 0);

        assert!(version.level(3).is_ok());
        assert!(matches!(
            version.level(4),
            Err(PyramidError::LevelOutOfRange { level: 4, .. })
        ));
    }

    #[test]
    fn test_min_level_above_max_generates_nothing() {
        let temp = TempDir::new().unwrap();
        let mut version = Version::new(context(temp.path()), 0);

        let report = version.generate(10).unwrap();

        assert!(report.levels.is_empty());
        assert_eq!(report.totals().total(), 0);
        assert!(version.is_complete());
        assert!(temp.path().join("dest/dzi/v0/dzi.xml").exists());
    }

    #[test]
    fn test_previous_version_number() {
        let ctx = context(Path::new("/p"));
        assert_eq!(Version::new(ctx.clone(), 0).previous_version_number(), None);
        assert_eq!(Version::new(ctx, 3).previous_version_number(), Some(2));
    }
}
