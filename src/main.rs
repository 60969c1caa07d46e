use clap::Parser;
use colored::*;
use courier_orders::cli::{self, Args};
use courier_orders::constants::{EXIT_EMPTY_INPUT, INPUT_FORMAT_EXAMPLE};
use courier_orders::{OrderError, OrderProcessor};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Format help needs no logging or input
    if args.show_format {
        println!("Paste orders like this, one block per parcel:\n");
        println!("{INPUT_FORMAT_EXAMPLE}");
        process::exit(0);
    }

    cli::setup_logging(&args);

    match run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            // Empty input is a warning for the user, not a failure trace
            if error
                .downcast_ref::<OrderError>()
                .is_some_and(OrderError::is_empty_input)
            {
                cli::report_empty_input();
                process::exit(EXIT_EMPTY_INPUT);
            }
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let raw = args.read_input()?;
    let processor = OrderProcessor::new(args.to_config())?;

    // Dump parsed records without mapping or writing anything
    if args.emit_records {
        let records = processor.parse(&raw)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&records).map_err(OrderError::from)?
        );
        return Ok(());
    }

    if args.dry_run {
        let preview = processor.preview(&raw)?;
        let config = processor.config();
        println!(
            "{}",
            format!("{} preview ({} not written)", config.courier, config.format)
                .bright_cyan()
                .bold()
        );
        println!("{preview}");
        return Ok(());
    }

    let stats = processor.export(&raw)?;
    cli::report_summary(&stats);
    Ok(())
}
