//! Versioned tile pyramid generation.
//!
//! A pyramid is a stack of versions. Each version is a full multi-resolution
//! tile tree whose finest (max) level comes from user-supplied source tiles
//! and whose coarser levels are built by combining four tiles of the level
//! above into one.
//!
//! Later versions only recompute what changed: tiles with no new source
//! image, and coarser tiles whose parents are unchanged, become symlinks to
//! the same tile of the previous version. Whether a tile changed is read
//! back from disk (a symlink vs a regular file), so no index is kept.
//!
//! # Hierarchy
//!
//! - [`Pyramid`] owns the worker pool and the versions
//! - [`Version`] walks its levels from the max level down to the minimum
//! - [`Level`] generates its tiles in parallel
//! - [`Tile`] decides per tile whether to link, combine or skip
//!
//! Levels are strictly sequential because every tile reads the level above.

mod context;
mod error;
mod generator;
mod layout;
mod level;
mod tile;
mod version;

pub use context::PyramidContext;
pub use error::{PyramidError, PyramidResult};
pub use generator::Pyramid;
pub use layout::{PyramidLayout, COMPLETION_MARKER};
pub use level::{Level, LevelStats};
pub use tile::{Tile, TileOutcome};
pub use version::{Version, VersionReport};
