//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init` for inspecting
//! and creating `~/.fastpyramid/config.ini`, or the file given with
//! `--config`.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use fastpyramid::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Print the effective configuration
    ///
    /// Values missing from config.ini are shown with their defaults.
    Show {
        /// Read this config.ini instead of ~/.fastpyramid/config.ini
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a config.ini with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Write this config.ini instead of ~/.fastpyramid/config.ini
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show { config } => run_show(&target_path(config.as_deref())),
        ConfigCommands::Init { force, config } => run_init(&target_path(config.as_deref()), force),
    }
}

/// The file a config command operates on.
fn target_path(config: Option<&Path>) -> PathBuf {
    config.map(Path::to_path_buf).unwrap_or_else(config_file_path)
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;

    if path.exists() {
        println!("# Loaded from {}", path.display());
    } else {
        println!("# {} not found, showing defaults", path.display());
    }
    print!("{}", config.to_ini_string());
    Ok(())
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if force {
        ConfigFile::default().save_to(path)?;
    } else if !ConfigFile::ensure_exists(path)? {
        println!("Config file already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
