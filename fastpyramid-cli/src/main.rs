//! FastPyramid CLI - Command-line interface
//!
//! This binary provides a command-line interface to the fastpyramid library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::generate::GenerateArgs;
use commands::info::InfoArgs;

#[derive(Parser)]
#[command(name = "fastpyramid")]
#[command(version = fastpyramid::VERSION)]
#[command(about = "Generate versioned Deep Zoom tile pyramids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate pyramid versions from full-resolution source tiles
    ///
    /// Source tiles for version N are read from <base-path>/vN/<x>_<y>.<ext>.
    /// Output is written to <base-path>/dest/dzi/vN/. Versions after the
    /// first only recompute tiles affected by new source tiles.
    Generate(GenerateArgs),

    /// Show level count and tile grids for an image size
    Info(InfoArgs),

    /// Manage config.ini
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
