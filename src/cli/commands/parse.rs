//! Parse command implementation
//!
//! Resolves the inputs to GenBank files and parses them one after another
//! into the configured output.

use super::shared::{
    RunStats, build_sink, create_progress_bar, discover_inputs, load_configuration, setup_logging,
};
use crate::app::services::genbank_parser::GenbankParser;
use crate::cli::args::ParseArgs;
use crate::{Error, Result};
use std::time::Instant;
use tracing::info;

/// Run the parse command
pub async fn run_parse(args: ParseArgs) -> Result<RunStats> {
    setup_logging(&args.common)?;
    args.validate()?;

    let start_time = Instant::now();
    let config = load_configuration(&args.common, Some(&args.output))?;

    let files = discover_inputs(&args.inputs)?;
    if files.is_empty() {
        return Err(Error::configuration("No GenBank input files found"));
    }
    info!("Parsing {} input file(s)", files.len());

    let parser = GenbankParser::from_config(&config);
    let mut sink = build_sink(&config, args.output.format)?;

    let progress = (files.len() > 1 && args.common.show_progress())
        .then(|| create_progress_bar(files.len() as u64, "Parsing"));

    let mut stats = RunStats::default();
    for file in &files {
        if let Some(pb) = &progress {
            pb.set_message(
                file.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        }

        let parse_stats = parser.parse_file(file, &mut sink)?;
        stats.record_parse(&parse_stats);

        if let Some(pb) = &progress {
            pb.inc(1);
        }
        // Let a pending Ctrl-C win between files
        tokio::task::yield_now().await;
    }

    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }

    stats.files_written = sink.written();
    stats.processing_time = start_time.elapsed();
    if args.common.show_progress() {
        stats.print_summary();
    }
    Ok(stats)
}
