//! Command-line argument definitions for the GenBank parser
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::app::services::nuccore_client::GenomeIds;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the GenBank flat-file parser
///
/// Converts GenBank nucleotide entries into structured JSON records, one
/// per `//`-terminated entry.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gbparse",
    version,
    about = "Convert GenBank flat files into structured JSON records",
    long_about = "Parses GenBank flat-file nucleotide entries into structured records. Fields \
                  are recognised by their column layout, converted by field-specific converters \
                  and written as JSON, either one file per record (named after the LOCUS \
                  identifier) or as a stream on stdout. Entries can also be fetched directly \
                  from NCBI nuccore."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse local GenBank files into JSON records
    Parse(ParseArgs),
    /// Fetch entries from NCBI nuccore and parse them
    Fetch(FetchArgs),
    /// List the fields and subfields with registered converters
    Fields(FieldsArgs),
}

/// Options shared by every command
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct CommonArgs {
    /// Path to configuration file
    ///
    /// JSON configuration file for column layout, fetch and output settings.
    /// If not specified, looks for <config dir>/gbparse/config.json and falls
    /// back to built-in defaults.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and hides progress bars.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Where and how finished records are written
#[derive(Debug, Clone, ClapArgs)]
pub struct OutputArgs {
    /// Output directory for per-record JSON files
    ///
    /// Each record is written to <LOCUS>.json. Created if it doesn't exist.
    /// If not specified, records are written to stdout.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Write one <LOCUS>.json file per record into this directory"
    )]
    pub output_dir: Option<PathBuf>,

    /// What is printed to stdout for each record
    #[arg(
        long = "format",
        value_enum,
        default_value = "json",
        help = "Per-record stdout format"
    )]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long = "pretty", help = "Pretty-print JSON output")]
    pub pretty: bool,
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// Input files, directories or glob patterns
    ///
    /// Directories are searched recursively for .gb, .gbk, .gbff, .gbf and
    /// .genbank files.
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    pub inputs: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the fetch command
#[derive(Debug, Clone, Parser)]
pub struct FetchArgs {
    /// Comma-separated GI numbers or accessions (e.g. U49845,NC_000913.3)
    #[arg(value_name = "IDS")]
    pub ids: GenomeIds,

    /// Request timeout in seconds (overrides configuration)
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// URL template with an {ids} placeholder (overrides configuration)
    #[arg(long = "url", value_name = "TEMPLATE")]
    pub url_template: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the fields command
#[derive(Debug, Clone, Parser)]
pub struct FieldsArgs {
    /// Output format for the field listing
    #[arg(
        long = "format",
        value_enum,
        default_value = "summary",
        help = "Output format for the field listing"
    )]
    pub format: OutputFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON documents
    Json,
    /// One coloured summary line per item
    Summary,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Result<Commands> {
        self.command
            .clone()
            .ok_or_else(|| Error::configuration("No command given"))
    }
}

impl CommonArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }
        Ok(())
    }
}

impl OutputArgs {
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(Error::configuration(format!(
                    "Output path is not a directory: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

impl ParseArgs {
    /// Validate the parse command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.inputs.iter().all(|input| input.trim().is_empty()) {
            return Err(Error::configuration("At least one input is required"));
        }
        self.output.validate()?;
        self.common.validate()
    }
}

impl FetchArgs {
    /// Validate the fetch command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == Some(0) {
            return Err(Error::configuration("Timeout must be greater than 0 seconds"));
        }
        self.output.validate()?;
        self.common.validate()
    }
}
