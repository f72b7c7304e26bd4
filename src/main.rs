use clap::Parser;
use gbparse::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                // Without a handler, never resolve and let the command finish
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(gbparse::Error::processing_interrupted(
                    "Processing interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", anyhow::Error::from(error));
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("gbparse - GenBank flat-file parser");
    println!("==================================");
    println!();
    println!("Convert GenBank nucleotide entries into structured JSON records,");
    println!("one record per //-terminated entry.");
    println!();
    println!("USAGE:");
    println!("    gbparse <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    parse       Parse local GenBank files, directories or globs");
    println!("    fetch       Fetch entries from NCBI nuccore and parse them");
    println!("    fields      List the fields and subfields with converters");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Print every record in a file as JSON:");
    println!("    gbparse parse sequence.gb");
    println!();
    println!("    # Write one <LOCUS>.json per record for a whole directory:");
    println!("    gbparse parse data/ --output records/ --pretty");
    println!();
    println!("    # Fetch two entries and print one summary line per record:");
    println!("    gbparse fetch U49845,NC_000913.3 --format summary");
    println!();
    println!("For detailed help on any command, use:");
    println!("    gbparse <COMMAND> --help");
}
