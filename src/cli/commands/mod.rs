//! Command implementations for the gbparse CLI
//!
//! This module contains the command execution logic, progress reporting,
//! and error handling for the CLI interface. Each command is implemented in
//! its own module.

pub mod fetch;
pub mod fields;
pub mod parse;
pub mod shared;

pub use shared::RunStats;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner
///
/// Dispatches to the subcommand handler:
/// - `parse`: local files, directories or globs to JSON
/// - `fetch`: NCBI nuccore download followed by a parse
/// - `fields`: the supported field/subfield table
pub async fn run(args: Args) -> Result<RunStats> {
    match args.get_command()? {
        Commands::Parse(parse_args) => parse::run_parse(parse_args).await,
        Commands::Fetch(fetch_args) => fetch::run_fetch(fetch_args).await,
        Commands::Fields(fields_args) => fields::run_fields(fields_args).await,
    }
}
