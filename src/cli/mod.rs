//! CLI layer for munch.
//!
//! Provides the command-line interface using clap, with commands for
//! initializing the database and managing lists and spots.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands, ListCommands, SpotCommands};
