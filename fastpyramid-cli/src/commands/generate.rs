//! `generate` command: build pyramid versions from source tiles.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use fastpyramid::config::{ConfigFile, GenerationConfig};
use fastpyramid::descriptor::{DeepZoomDescriptor, Descriptor, TileFormat};
use fastpyramid::pyramid::{Pyramid, VersionReport};
use tracing::info;

use super::common::FormatArg;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `fastpyramid generate`.
///
/// Options left unset fall back to config.ini.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Directory holding the v0/, v1/, ... source tile folders
    #[arg(long)]
    pub base_path: PathBuf,

    /// Width of the full-resolution image in pixels
    #[arg(long)]
    pub width: u32,

    /// Height of the full-resolution image in pixels
    #[arg(long)]
    pub height: u32,

    /// Number of versions to generate, starting at version 0
    #[arg(long, default_value_t = 1)]
    pub versions: u32,

    /// Tile edge length in pixels
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Tile overlap in pixels
    #[arg(long)]
    pub overlap: Option<u32>,

    /// Tile image format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Coarsest level to generate
    #[arg(long)]
    pub min_level: Option<u32>,

    /// Worker threads per level
    #[arg(long)]
    pub threads: Option<usize>,

    /// Remove previously generated output before starting
    #[arg(long)]
    pub clean: bool,

    /// Use this config.ini instead of ~/.fastpyramid/config.ini
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug logging, mirrored to stdout
    #[arg(long, short)]
    pub verbose: bool,
}

/// Effective parameters after merging arguments over config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSettings {
    pub tile_size: u32,
    pub overlap: u32,
    pub format: TileFormat,
    pub generation: GenerationConfig,
}

impl GenerateArgs {
    /// Merge command-line values over the config file.
    pub fn resolve(&self, config: &ConfigFile) -> Result<GenerateSettings, CliError> {
        if self.versions == 0 {
            return Err(CliError::Config(
                "--versions must be at least 1".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(CliError::Config(
                "--threads must be at least 1".to_string(),
            ));
        }

        let generation = GenerationConfig::from(config);
        let generation = match self.min_level {
            Some(min_level) => generation.with_min_level(min_level),
            None => generation,
        };
        let generation = match self.threads {
            Some(threads) => generation.with_threads(threads),
            None => generation,
        };

        Ok(GenerateSettings {
            tile_size: self.tile_size.unwrap_or(config.pyramid.tile_size),
            overlap: self.overlap.unwrap_or(config.pyramid.overlap),
            format: self.format.map(TileFormat::from).unwrap_or(config.pyramid.format),
            generation,
        })
    }
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.verbose)?;
    runner.log_startup("generate");
    let settings = args.resolve(runner.config())?;

    let descriptor = DeepZoomDescriptor::new(
        args.width,
        args.height,
        settings.tile_size,
        settings.overlap,
        settings.format,
    )?;
    let num_levels = descriptor.num_levels();

    let mut pyramid = Pyramid::new(
        &args.base_path,
        Arc::new(descriptor),
        settings.format,
        settings.generation,
        runner.logger(),
    )?;

    println!(
        "Pyramid: {}x{} px, {} levels, tile size {} ({}), {} threads",
        args.width,
        args.height,
        num_levels,
        settings.tile_size,
        settings.format,
        settings.generation.threads()
    );
    println!("Base path: {}", pyramid.layout().base_path().display());

    if args.clean {
        pyramid.clean()?;
        println!("Removed {}", pyramid.layout().output_root().display());
    }

    for version in 0..args.versions {
        let report = pyramid.generate_version(version)?;
        println!("{}", summarize(&report));
    }

    info!("Generated {} version(s)", args.versions);
    println!(
        "Output: {}",
        pyramid.layout().output_root().join("dzi").display()
    );
    Ok(())
}

/// One-line summary of a generated version.
pub fn summarize(report: &VersionReport) -> String {
    let totals = report.totals();
    let skipped = report
        .levels
        .iter()
        .filter(|(_, stats)| stats.skipped)
        .count();

    let mut line = format!(
        "Version {}: {} combined, {} linked to source, {} linked to previous version",
        report.version, totals.combined, totals.linked_to_source, totals.linked_to_previous
    );
    if totals.already_generated > 0 {
        line.push_str(&format!(", {} already present", totals.already_generated));
    }
    if skipped > 0 {
        line.push_str(&format!(" ({} of {} levels already complete)", skipped, report.levels.len()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastpyramid::pyramid::LevelStats;

    fn args() -> GenerateArgs {
        GenerateArgs {
            base_path: PathBuf::from("/data"),
            width: 100,
            height: 100,
            versions: 1,
            tile_size: None,
            overlap: None,
            format: None,
            min_level: None,
            threads: None,
            clean: false,
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn test_resolve_uses_config_defaults() {
        let mut config = ConfigFile::default();
        config.pyramid.tile_size = 512;
        config.pyramid.format = TileFormat::Png;
        config.generation.threads = 6;

        let settings = args().resolve(&config).unwrap();

        assert_eq!(settings.tile_size, 512);
        assert_eq!(settings.overlap, config.pyramid.overlap);
        assert_eq!(settings.format, TileFormat::Png);
        assert_eq!(settings.generation.threads(), 6);
        assert_eq!(settings.generation.min_level(), config.pyramid.min_level);
    }

    #[test]
    fn test_resolve_prefers_arguments() {
        let mut args = args();
        args.tile_size = Some(128);
        args.overlap = Some(0);
        args.format = Some(FormatArg::Jpg);
        args.min_level = Some(0);
        args.threads = Some(2);
        let mut config = ConfigFile::default();
        config.pyramid.format = TileFormat::Png;

        let settings = args.resolve(&config).unwrap();

        assert_eq!(settings.tile_size, 128);
        assert_eq!(settings.overlap, 0);
        assert_eq!(settings.format, TileFormat::Jpeg);
        assert_eq!(settings.generation, GenerationConfig::new(0, 2));
    }

    #[test]
    fn test_resolve_rejects_zero_counts() {
        let mut zero_versions = args();
        zero_versions.versions = 0;
        assert!(matches!(
            zero_versions.resolve(&ConfigFile::default()),
            Err(CliError::Config(_))
        ));

        let mut zero_threads = args();
        zero_threads.threads = Some(0);
        assert!(matches!(
            zero_threads.resolve(&ConfigFile::default()),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_summarize() {
        let report = VersionReport {
            version: 1,
            levels: vec![
                (
                    3,
                    LevelStats {
                        linked_to_source: 1,
                        linked_to_previous: 3,
                        ..LevelStats::default()
                    },
                ),
                (
                    2,
                    LevelStats {
                        skipped: true,
                        ..LevelStats::default()
                    },
                ),
            ],
        };

        assert_eq!(
            summarize(&report),
            "Version 1: 0 combined, 1 linked to source, 3 linked to previous version \
             (1 of 2 levels already complete)"
        );
    }
}
