//! FastPyramid - incremental Deep Zoom pyramid generation
//!
//! Builds multi-resolution tile pyramids from full-resolution source tiles.
//! Each new version reuses the previous one through symlinks, so only tiles
//! whose sources changed are recombined.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fastpyramid::config::GenerationConfig;
//! use fastpyramid::descriptor::TileFormat;
//! use fastpyramid::log::TracingLogger;
//! use fastpyramid::pyramid::Pyramid;
//!
//! let mut pyramid = Pyramid::deep_zoom(
//!     "/data/galaxy",
//!     1480,
//!     940,
//!     254,
//!     1,
//!     TileFormat::Jpeg,
//!     GenerationConfig::default(),
//!     Arc::new(TracingLogger::new()),
//! )?;
//! pyramid.generate_version(0)?;
//! # Ok::<(), fastpyramid::pyramid::PyramidError>(())
//! ```

pub mod combine;
pub mod config;
pub mod descriptor;
pub mod log;
pub mod logging;
pub mod pyramid;

/// Version of the library and CLI, taken from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
