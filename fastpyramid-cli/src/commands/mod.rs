//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`generate`] - Generate pyramid versions from source tiles
//! - [`info`] - Show the level layout for an image size

pub mod common;
pub mod config;
pub mod generate;
pub mod info;
