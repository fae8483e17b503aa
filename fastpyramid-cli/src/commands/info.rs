//! `info` command: show the level layout for an image size.

use clap::Args;
use fastpyramid::config::{DEFAULT_TILE_FORMAT, DEFAULT_TILE_OVERLAP, DEFAULT_TILE_SIZE};
use fastpyramid::descriptor::{DeepZoomDescriptor, Descriptor};

use super::common::FormatArg;
use crate::error::CliError;

/// Arguments for `fastpyramid info`.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Width of the full-resolution image in pixels
    #[arg(long)]
    pub width: u32,

    /// Height of the full-resolution image in pixels
    #[arg(long)]
    pub height: u32,

    /// Tile edge length in pixels
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: u32,

    /// Tile overlap in pixels
    #[arg(long, default_value_t = DEFAULT_TILE_OVERLAP)]
    pub overlap: u32,

    /// Print the descriptor XML as well
    #[arg(long)]
    pub xml: bool,

    /// Tile image format (only affects --xml)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> Result<(), CliError> {
    let format = args.format.map(Into::into).unwrap_or(DEFAULT_TILE_FORMAT);
    let descriptor =
        DeepZoomDescriptor::new(args.width, args.height, args.tile_size, args.overlap, format)?;

    print!("{}", level_table(&descriptor));

    if args.xml {
        println!();
        print!("{}", descriptor.to_xml());
    }
    Ok(())
}

/// Per-level dimensions and tile grids, finest level first.
pub fn level_table(descriptor: &DeepZoomDescriptor) -> String {
    let mut out = format!(
        "{}x{} px, tile size {}: {} levels (0-{})\n\n",
        descriptor.width(),
        descriptor.height(),
        descriptor.tile_size(),
        descriptor.num_levels(),
        descriptor.max_level()
    );
    out.push_str(&format!(
        "{:>5}  {:>13}  {:>9}  {:>8}\n",
        "Level", "Size", "Grid", "Tiles"
    ));

    let mut total = 0u64;
    for level in (0..descriptor.num_levels()).rev() {
        let (width, height) = descriptor.dimensions(level);
        let grid = descriptor.num_tiles(level);
        total += grid.len();
        out.push_str(&format!(
            "{:>5}  {:>13}  {:>9}  {:>8}\n",
            level,
            format!("{}x{}", width, height),
            format!("{}x{}", grid.columns, grid.rows),
            grid.len()
        ));
    }
    out.push_str(&format!("\nTotal tiles per version: {}\n", total));
    out
}
