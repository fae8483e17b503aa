//! One resolution level of one version.

use std::fs;
use std::ops::AddAssign;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::context::PyramidContext;
use super::error::{PyramidError, PyramidResult};
use super::tile::{Tile, TileOutcome};
use crate::descriptor::TileGrid;
use crate::{log_debug, log_info};

/// Tile counts for one level, or summed over several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStats {
    pub linked_to_source: usize,
    pub linked_to_previous: usize,
    pub combined: usize,
    pub already_generated: usize,
    pub unchanged: usize,
    /// The level was already marked complete and was not walked
    pub skipped: bool,
}

impl LevelStats {
    /// Tiles visited.
    pub fn total(&self) -> usize {
        self.linked_to_source
            + self.linked_to_previous
            + self.combined
            + self.already_generated
            + self.unchanged
    }

    /// Tiles written by this run.
    pub fn written(&self) -> usize {
        self.linked_to_source + self.linked_to_previous + self.combined
    }

    fn record(&mut self, outcome: TileOutcome, count: usize) {
        let slot = match outcome {
            TileOutcome::LinkedToSource => &mut self.linked_to_source,
            TileOutcome::LinkedToPreviousVersion => &mut self.linked_to_previous,
            TileOutcome::Combined => &mut self.combined,
            TileOutcome::AlreadyGenerated => &mut self.already_generated,
            TileOutcome::Unchanged => &mut self.unchanged,
        };
        *slot += count;
    }
}

impl AddAssign for LevelStats {
    fn add_assign(&mut self, other: Self) {
        self.linked_to_source += other.linked_to_source;
        self.linked_to_previous += other.linked_to_previous;
        self.combined += other.combined;
        self.already_generated += other.already_generated;
        self.unchanged += other.unchanged;
        self.skipped &= other.skipped;
    }
}

const OUTCOMES: [TileOutcome; 5] = [
    TileOutcome::AlreadyGenerated,
    TileOutcome::LinkedToSource,
    TileOutcome::LinkedToPreviousVersion,
    TileOutcome::Combined,
    TileOutcome::Unchanged,
];

/// Per-outcome counters shared by the workers of one level, indexed like
/// [`OUTCOMES`].
#[derive(Default)]
struct OutcomeCounters([AtomicUsize; OUTCOMES.len()]);

impl OutcomeCounters {
    fn increment(&self, outcome: TileOutcome) {
        let index = match outcome {
            TileOutcome::AlreadyGenerated => 0,
            TileOutcome::LinkedToSource => 1,
            TileOutcome::LinkedToPreviousVersion => 2,
            TileOutcome::Combined => 3,
            TileOutcome::Unchanged => 4,
        };
        self.0[index].fetch_add(1, Ordering::Relaxed);
    }

    fn into_stats(self) -> LevelStats {
        let mut stats = LevelStats::default();
        for (outcome, counter) in OUTCOMES.into_iter().zip(self.0) {
            stats.record(outcome, counter.into_inner());
        }
        stats
    }
}

/// A level inside a version.
///
/// Tiles of a level only read the level above (or the previous version),
/// never each other, so the whole level is generated in parallel. The level
/// above must be complete first.
#[derive(Debug, Clone)]
pub struct Level {
    ctx: Arc<PyramidContext>,
    version: u32,
    number: u32,
    grid: TileGrid,
}

impl Level {
    pub(crate) fn new(ctx: Arc<PyramidContext>, version: u32, number: u32) -> PyramidResult<Self> {
        let grid = ctx.grid(number)?;
        Ok(Self {
            ctx,
            version,
            number,
            grid,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn grid(&self) -> TileGrid {
        self.grid
    }

    pub fn is_max_level(&self) -> bool {
        self.ctx.is_max_level(self.number)
    }

    /// View the tile at `(x, y)`. Bounds are checked when the tile is used.
    pub fn tile(&self, x: u32, y: u32) -> Tile<'_> {
        Tile::with_grid(&self.ctx, self.version, self.number, self.grid, x, y)
    }

    /// Whether a previous run finished this level.
    pub fn is_complete(&self) -> bool {
        self.ctx
            .layout()
            .level_marker(self.version, self.number)
            .exists()
    }

    /// Generate every tile of the level on the current rayon pool.
    ///
    /// A level already marked complete is skipped. The marker is written
    /// only after every tile succeeded, so an interrupted level is walked
    /// again on the next run and its existing tiles are left untouched.
    pub fn generate(&self) -> PyramidResult<LevelStats> {
        let logger = self.ctx.logger();
        if self.is_complete() {
            log_debug!(
                logger,
                "version {} level {} already complete, skipping",
                self.version,
                self.number
            );
            return Ok(LevelStats {
                skipped: true,
                ..LevelStats::default()
            });
        }

        let started = Instant::now();
        log_info!(
            logger,
            "generating version {} level {} ({}x{} tiles)",
            self.version,
            self.number,
            self.grid.columns,
            self.grid.rows
        );

        let dir = self.ctx.layout().level_dir(self.version, self.number);
        fs::create_dir_all(&dir).map_err(|e| PyramidError::io(&dir, e))?;

        let counters = OutcomeCounters::default();
        (0..self.grid.columns)
            .into_par_iter()
            .flat_map_iter(|x| (0..self.grid.rows).map(move |y| (x, y)))
            .try_for_each(|(x, y)| {
                let outcome = self.tile(x, y).generate()?;
                counters.increment(outcome);
                Ok::<_, PyramidError>(())
            })?;

        let marker = self.ctx.layout().level_marker(self.version, self.number);
        fs::write(&marker, b"").map_err(|e| PyramidError::io(&marker, e))?;

        let stats = counters.into_stats();
        log_info!(
            logger,
            "version {} level {} done in {}: {} combined, {} linked, {} already present",
            self.version,
            self.number,
            format_duration(started.elapsed()),
            stats.combined,
            stats.linked_to_source + stats.linked_to_previous,
            stats.already_generated
        );
        Ok(stats)
    }
}

fn format_duration(elapsed: Duration) -> String {
    if elapsed.as_secs() >= 60 {
        format!("{}m{:02}s", elapsed.as_secs() / 60, elapsed.as_secs() % 60)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}
