//! Rail Trace CLI
//!
//! Analyses a recorded Chrome trace and reports RAIL time ranges with
//! frame rate, script cost by origin and forced layout counts.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use rail_trace::commands::{
    display_schema, display_version, execute_analyze, parse_type_binding, validate_args,
    validate_report_file, AnalyzeArgs,
};
use rail_trace::RailType;

/// Rail Trace - RAIL analysis for browser performance traces
#[derive(Parser, Debug)]
#[command(name = "rail-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyse a trace file
    Analyze {
        /// Trace file (Chrome trace-event JSON)
        #[arg(short, long)]
        trace: PathBuf,

        /// Output path for the JSON report (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if browser extensions ran during capture
        #[arg(long, env = "RAIL_TRACE_STRICT")]
        strict: bool,

        /// Explicit range type, e.g. --type sideNavAnimation=Animation (repeatable)
        #[arg(long = "type", value_parser = parse_type_binding)]
        types: Vec<(String, RailType)>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            trace,
            output,
            strict,
            types,
            summary,
        } => {
            let args = AnalyzeArgs {
                trace_path: trace,
                output_json: output,
                strict,
                types: types.into_iter().collect(),
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
