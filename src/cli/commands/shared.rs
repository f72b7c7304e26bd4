//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::app::models::{Record, Value};
use crate::app::services::genbank_parser::ParseStats;
use crate::app::services::record_sink::{CallbackSink, JsonDirectorySink, RecordSink};
use crate::cli::args::{CommonArgs, OutputArgs, OutputFormat};
use crate::config::Config;
use crate::constants::{CONTENT_KEY, GENBANK_EXTENSIONS, content_keys};
use crate::{Error, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Processing statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Number of inputs parsed
    pub inputs_processed: usize,
    /// Number of records emitted
    pub records_emitted: usize,
    /// Number of input lines read
    pub lines_read: usize,
    /// Number of non-fatal diagnostics
    pub diagnostics: usize,
    /// Files written to the output directory
    pub files_written: Vec<PathBuf>,
    /// Total processing time
    pub processing_time: Duration,
}

impl RunStats {
    /// Add the statistics of one parsed input
    pub fn record_parse(&mut self, stats: &ParseStats) {
        self.inputs_processed += 1;
        self.records_emitted += stats.records_emitted;
        self.lines_read += stats.lines_read;
        self.diagnostics += stats.diagnostics.len();
    }

    /// Print the run summary to stderr, keeping stdout for records
    pub fn print_summary(&self) {
        eprintln!("\n{}", "Parsing Summary".bright_green().bold());
        eprintln!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            self.processing_time.as_millis().to_string().bright_white()
        );
        eprintln!(
            "  {} {}",
            "Inputs parsed:".bright_cyan(),
            self.inputs_processed.to_string().bright_white()
        );
        eprintln!(
            "  {} {}",
            "Records:".bright_cyan(),
            self.records_emitted.to_string().bright_white().bold()
        );
        if !self.files_written.is_empty() {
            eprintln!(
                "  {} {}",
                "Files written:".bright_cyan(),
                self.files_written.len().to_string().bright_white()
            );
        }
        if self.diagnostics > 0 {
            eprintln!(
                "  {} {}",
                "Diagnostics:".bright_yellow(),
                self.diagnostics.to_string().bright_yellow().bold()
            );
        }
    }
}

/// Set up structured logging
pub fn setup_logging(common: &CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = common.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gbparse={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| Error::configuration(format!("Failed to initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration (file -> defaults) and apply CLI overrides
pub fn load_configuration(common: &CommonArgs, output: Option<&OutputArgs>) -> Result<Config> {
    info!("Loading configuration");

    let mut config = Config::load(common.config_file.as_deref())?;

    if let Some(output) = output {
        if output.pretty {
            config = config.with_pretty(true);
        }
        if let Some(dir) = &output.output_dir {
            config = config.with_output_directory(dir.clone());
        }
    }

    config.validate()?;
    Ok(config)
}

/// Resolve inputs to a sorted, de-duplicated list of files
///
/// Each input is a file, a directory searched recursively for GenBank
/// extensions, or a glob pattern.
pub fn discover_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            let found = discover_genbank_files(path)?;
            if found.is_empty() {
                warn!("No GenBank files found in {}", path.display());
            }
            files.extend(found);
        } else {
            let matches = glob::glob(input)
                .map_err(|e| Error::configuration(format!("Invalid pattern '{}': {}", input, e)))?
                .filter_map(|entry| entry.ok())
                .filter(|path| path.is_file())
                .collect::<Vec<_>>();
            if matches.is_empty() {
                return Err(Error::file_not_found(input.clone()));
            }
            files.extend(matches);
        }
    }

    files.sort();
    files.dedup();

    debug!("Discovered {} input files", files.len());
    Ok(files)
}

/// Discover GenBank files in a directory tree
pub fn discover_genbank_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && has_genbank_extension(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn has_genbank_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            GENBANK_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Build the sink for the configured output mode
///
/// With an output directory, records are persisted and `summary` format
/// additionally prints one line per record. Without one, records are printed
/// to stdout as JSON lines or summaries.
pub fn build_sink(config: &Config, format: OutputFormat) -> Result<OutputSink> {
    let pretty = config.output.pretty;
    let print = move |record: &Record| -> Result<()> {
        match format {
            OutputFormat::Json => print_record_json(record, pretty),
            OutputFormat::Summary => print_record_summary(record),
        }
    };

    match &config.output.directory {
        Some(dir) => {
            let directory = JsonDirectorySink::new(dir)?.with_pretty(pretty);
            info!("Writing records to {}", directory.directory().display());
            let show = format == OutputFormat::Summary;
            let callback: PrintFn =
                Box::new(move |record: &Record| if show { print(record) } else { Ok(()) });
            Ok(OutputSink::Directory(Box::new(CallbackSink::wrapping(
                callback, directory,
            ))))
        }
        None => Ok(OutputSink::Stdout(Box::new(CallbackSink::new(print)))),
    }
}

type PrintFn = Box<dyn FnMut(&Record) -> Result<()>>;

/// Sink chosen by [`build_sink`]
pub enum OutputSink {
    Stdout(Box<dyn RecordSink>),
    Directory(Box<CallbackSink<PrintFn, JsonDirectorySink>>),
}

impl OutputSink {
    /// Files persisted so far (empty for stdout output)
    pub fn written(&self) -> Vec<PathBuf> {
        match self {
            OutputSink::Stdout(_) => Vec::new(),
            OutputSink::Directory(sink) => sink.inner().written().to_vec(),
        }
    }
}

impl RecordSink for OutputSink {
    fn accept(&mut self, record: Record) -> Result<()> {
        match self {
            OutputSink::Stdout(sink) => sink.accept(record),
            OutputSink::Directory(sink) => sink.accept(record),
        }
    }
}

fn print_record_json(record: &Record, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json).map_err(|e| Error::io("Failed to write to stdout", e))
}

/// One coloured line: identifier, length, gene count, definition
fn print_record_summary(record: &Record) -> Result<()> {
    let id = record.identifier().unwrap_or("<no locus>");
    let length = record
        .get("locus")
        .and_then(Value::as_map)
        .and_then(|locus| {
            locus.iter().find_map(|(key, value)| match key {
                Some(key) if key.starts_with("size") => {
                    value.as_text().map(|size| format!("{} {}", size, size_unit(key)))
                }
                _ => None,
            })
        })
        .unwrap_or_else(|| "?".to_string());
    let genes = record
        .get(CONTENT_KEY)
        .and_then(|content| content.get(Some(content_keys::GENES)))
        .and_then(Value::as_list)
        .map_or(0, <[Value]>::len);
    let definition = record
        .get("definition")
        .and_then(Value::as_text)
        .unwrap_or_default();

    let mut stdout = std::io::stdout().lock();
    writeln!(
        stdout,
        "{} {} {} {}",
        id.bright_white().bold(),
        length.bright_cyan(),
        format!("{} genes", genes).bright_green(),
        truncate(definition, 60)
    )
    .map_err(|e| Error::io("Failed to write to stdout", e))
}

/// `size [bp]` -> `bp`
fn size_unit(key: &str) -> &str {
    key.split_once('[')
        .and_then(|(_, rest)| rest.strip_suffix(']'))
        .unwrap_or("")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
