//! Tiles and the per-tile generation decision.
//!
//! Tiles are transient views over `(version, level, x, y)`: they are rebuilt
//! whenever needed and carry no state of their own. What a tile "is" lives
//! entirely on disk:
//!
//! - a **symlink** means the tile was linked, either to a source image or to
//!   the same tile of the previous version
//! - a **regular file** means the tile was combined from its parents
//!
//! That distinction drives change detection across versions.

use std::fmt;
use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use super::context::PyramidContext;
use super::error::{PyramidError, PyramidResult};
use crate::combine::{combine4, CombineOutcome};
use crate::descriptor::TileGrid;
use crate::{log_trace, log_warn};

/// What [`Tile::generate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileOutcome {
    /// The destination already existed; nothing was touched
    AlreadyGenerated,
    /// Symlinked to this version's source tile
    LinkedToSource,
    /// Symlinked to the same tile of the previous version
    LinkedToPreviousVersion,
    /// Combined from the four parent tiles
    Combined,
    /// Version 0 tile whose parents did not change; left ungenerated
    Unchanged,
}

impl fmt::Display for TileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileOutcome::AlreadyGenerated => "already generated",
            TileOutcome::LinkedToSource => "linked to source",
            TileOutcome::LinkedToPreviousVersion => "linked to previous version",
            TileOutcome::Combined => "combined",
            TileOutcome::Unchanged => "unchanged",
        };
        f.write_str(name)
    }
}

/// One tile of one level of one version.
#[derive(Clone, Copy)]
pub struct Tile<'a> {
    ctx: &'a PyramidContext,
    version: u32,
    level: u32,
    grid: TileGrid,
    x: u32,
    y: u32,
}

impl<'a> Tile<'a> {
    /// View the tile at `(x, y)`. The coordinates may be out of bounds;
    /// only `level` is validated here.
    pub fn new(
        ctx: &'a PyramidContext,
        version: u32,
        level: u32,
        x: u32,
        y: u32,
    ) -> PyramidResult<Self> {
        let grid = ctx.grid(level)?;
        Ok(Self::with_grid(ctx, version, level, grid, x, y))
    }

    pub(crate) fn with_grid(
        ctx: &'a PyramidContext,
        version: u32,
        level: u32,
        grid: TileGrid,
        x: u32,
        y: u32,
    ) -> Self {
        Self {
            ctx,
            version,
            level,
            grid,
            x,
            y,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn is_max_level(&self) -> bool {
        self.ctx.is_max_level(self.level)
    }

    pub fn is_within_bounds(&self) -> bool {
        self.grid.contains(self.x, self.y)
    }

    fn ensure_within_bounds(&self) -> PyramidResult<()> {
        if self.is_within_bounds() {
            return Ok(());
        }
        Err(PyramidError::TileOutOfBounds {
            version: self.version,
            level: self.level,
            x: self.x,
            y: self.y,
            columns: self.grid.columns,
            rows: self.grid.rows,
        })
    }

    /// Where this tile is written.
    pub fn dest_path(&self) -> PathBuf {
        self.ctx
            .layout()
            .tile_path(self.version, self.level, self.x, self.y)
    }

    /// Whether the destination exists. Symlinks are not followed, so a link
    /// whose target has gone missing still counts.
    pub fn is_generated(&self) -> bool {
        self.dest_path().symlink_metadata().is_ok()
    }

    /// User-supplied image for this tile. Max level only.
    pub fn source_tile_path(&self) -> PyramidResult<PathBuf> {
        if !self.is_max_level() {
            return Err(PyramidError::NotMaxLevel {
                level: self.level,
                max_level: self.ctx.max_level(),
            });
        }
        Ok(self
            .ctx
            .layout()
            .source_tile_path(self.version, self.x, self.y))
    }

    /// Whether this version supplies a new source image for the tile.
    pub fn has_source_tile_image(&self) -> PyramidResult<bool> {
        Ok(self.source_tile_path()?.exists())
    }

    /// The four finer tiles this tile is combined from, in quadrant order
    /// top-left, top-right, bottom-left, bottom-right.
    ///
    /// Right and bottom parents can be out of bounds when the finer level
    /// has an odd number of columns or rows.
    pub fn parent_tiles(&self) -> PyramidResult<[Tile<'a>; 4]> {
        self.ensure_within_bounds()?;
        if self.is_max_level() {
            return Err(PyramidError::MaxLevelHasNoParents { level: self.level });
        }
        let upper = self.level + 1;
        let grid = self.ctx.grid(upper)?;
        let (x, y) = (self.x * 2, self.y * 2);
        let parent = |px, py| Tile::with_grid(self.ctx, self.version, upper, grid, px, py);

        Ok([
            parent(x, y),
            parent(x + 1, y),
            parent(x, y + 1),
            parent(x + 1, y + 1),
        ])
    }

    /// The same coordinates one version back, or `None` for version 0.
    pub fn previous_version_tile(&self) -> Option<Tile<'a>> {
        let previous = self.version.checked_sub(1)?;
        Some(Tile { version: previous, ..*self })
    }

    /// Whether this tile's content differs from the previous version.
    ///
    /// - version 0 tiles always changed
    /// - a regular file was combined in this version, so it changed
    /// - a max-level symlink changed if this version supplies a new source
    /// - any other symlink points back at unchanged content
    ///
    /// The tile must already be generated.
    pub fn has_changed_since_last_version(&self) -> PyramidResult<bool> {
        self.ensure_within_bounds()?;
        let dest = self.dest_path();
        let metadata = match dest.symlink_metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PyramidError::NotGenerated { path: dest });
            }
            Err(e) => return Err(PyramidError::io(dest, e)),
        };

        if self.version == 0 {
            return Ok(true);
        }
        if !metadata.file_type().is_symlink() {
            return Ok(true);
        }
        if self.is_max_level() && self.has_source_tile_image()? {
            return Ok(true);
        }
        Ok(false)
    }

    /// Whether any in-bounds parent changed. Out-of-bounds parents are
    /// skipped without being queried.
    pub fn any_parent_tile_has_changed(&self) -> PyramidResult<bool> {
        for parent in self.parent_tiles()? {
            if parent.is_within_bounds() && parent.has_changed_since_last_version()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Produce this tile if it does not exist yet.
    ///
    /// | level     | version 0                    | version N > 0                                  |
    /// |-----------|------------------------------|------------------------------------------------|
    /// | max       | link to source               | link to new source, else to previous version   |
    /// | below max | combine if a parent changed  | combine if a parent changed, else link previous |
    ///
    /// Parents must have been generated already, i.e. the level above must
    /// be complete.
    pub fn generate(&self) -> PyramidResult<TileOutcome> {
        self.ensure_within_bounds()?;
        if self.is_generated() {
            return Ok(TileOutcome::AlreadyGenerated);
        }

        let outcome = match (self.previous_version_tile(), self.is_max_level()) {
            (None, true) => self.link_to(&self.source_tile_path()?, TileOutcome::LinkedToSource)?,
            (None, false) => {
                if self.any_parent_tile_has_changed()? {
                    self.generate_from_parent_tiles()?
                } else {
                    TileOutcome::Unchanged
                }
            }
            (Some(previous), true) => {
                if self.has_source_tile_image()? {
                    self.link_to(&self.source_tile_path()?, TileOutcome::LinkedToSource)?
                } else {
                    self.link_to_previous_version(&previous)?
                }
            }
            (Some(previous), false) => {
                if self.any_parent_tile_has_changed()? {
                    self.generate_from_parent_tiles()?
                } else {
                    self.link_to_previous_version(&previous)?
                }
            }
        };

        log_trace!(self.ctx.logger(), "tile {} {}", self, outcome);
        Ok(outcome)
    }

    /// Combine the in-bounds parents into this tile.
    pub fn generate_from_parent_tiles(&self) -> PyramidResult<TileOutcome> {
        let sources = self
            .parent_tiles()?
            .map(|parent| parent.is_within_bounds().then(|| parent.dest_path()));
        let expected = sources.iter().flatten().count();
        let dest = self.dest_path();

        let combined = combine4(
            sources.each_ref().map(|source| source.as_deref()),
            &dest,
            self.ctx.format(),
        )
        .map_err(|source| PyramidError::Combine {
            version: self.version,
            level: self.level,
            x: self.x,
            y: self.y,
            source,
        })?;

        Ok(match combined {
            CombineOutcome::Written { quadrants, .. } => {
                if quadrants < expected {
                    log_warn!(
                        self.ctx.logger(),
                        "tile {} combined from {} of {} parent tiles, unreadable parents left blank",
                        self,
                        quadrants,
                        expected
                    );
                }
                TileOutcome::Combined
            }
            CombineOutcome::AlreadyExists => TileOutcome::AlreadyGenerated,
        })
    }

    /// Link to the same tile of the previous version, which must exist.
    /// A level the previous version never generated (e.g. below its
    /// minimum level) would otherwise leave a dangling link.
    fn link_to_previous_version(&self, previous: &Tile<'_>) -> PyramidResult<TileOutcome> {
        if !previous.is_generated() {
            return Err(PyramidError::NotGenerated {
                path: previous.dest_path(),
            });
        }
        self.link_to(&previous.dest_path(), TileOutcome::LinkedToPreviousVersion)
    }

    /// Create `dest -> target` unless the destination appeared meanwhile.
    fn link_to(&self, target: &Path, outcome: TileOutcome) -> PyramidResult<TileOutcome> {
        let dest = self.dest_path();
        match symlink(target, &dest) {
            Ok(()) => Ok(outcome),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Ok(TileOutcome::AlreadyGenerated)
            }
            Err(source) => Err(PyramidError::Link {
                link: dest,
                target: target.to_path_buf(),
                source,
            }),
        }
    }

    /// Resolve the symlink chain of a generated tile to the file holding
    /// its pixels.
    pub fn resolved_path(&self) -> PyramidResult<PathBuf> {
        let dest = self.dest_path();
        fs::canonicalize(&dest).map_err(|e| PyramidError::io(dest, e))
    }
}

impl fmt::Display for Tile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v{}/{}/{}_{}",
            self.version, self.level, self.x, self.y
        )
    }
}

impl fmt::Debug for Tile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("version", &self.version)
            .field("level", &self.level)
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}
