//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads the trace file
//! 2. Runs the analysis pipeline
//! 3. Writes the report (file or stdout)
//! 4. Optionally prints a text summary

use super::models::AnalyzeArgs;
use crate::analysis::{analyze_trace_str, AnalysisOptions};
use crate::output::{report_to_string, write_report};
use crate::parser::{Report, TimeRange};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace file cannot be read
/// * Analysis errors (invalid input, no processes, extensions in strict mode)
/// * Report write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<Report> {
    let start_time = Instant::now();

    info!("Analysing trace: {}", args.trace_path.display());

    let raw = std::fs::read_to_string(&args.trace_path)
        .with_context(|| format!("Failed to read trace file {}", args.trace_path.display()))?;
    debug!("Read {} bytes of trace data", raw.len());

    let options = build_options(&args);
    let analysis = analyze_trace_str(&raw, &options).context("Failed to analyse trace")?;

    let report = Report::from_analysis(analysis, args.trace_path.display().to_string());

    match &args.output_json {
        Some(path) => {
            write_report(&report, path).context("Failed to write report JSON")?;
            info!("✓ Report written to: {}", path.display());
        }
        None => println!("{}", report_to_string(&report)?),
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("RAIL SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Trace: {}", args.trace_path.display());
        println!("{}", generate_text_summary(&report.ranges));
        for note in &report.advisories {
            println!("Note: {}", note);
        }
        println!("{}", "=".repeat(80));
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(report)
}

fn build_options(args: &AnalyzeArgs) -> AnalysisOptions {
    args.types.iter().fold(
        AnalysisOptions::new().with_strict(args.strict),
        |options, (title, rail_type)| options.with_type(title.clone(), *rail_type),
    )
}

/// Human readable table of ranges
///
/// **Public** - also handy in tests and debugging
pub fn generate_text_summary(ranges: &[TimeRange]) -> String {
    if ranges.is_empty() {
        return "No time ranges found".to_string();
    }

    let mut out = String::new();
    for range in ranges {
        let fps = range
            .fps
            .map(|f| format!("{:.1} fps", f))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<10} {:<30} {:>10.1}ms .. {:>10.1}ms ({:>8.1}ms)  {:>10}  layouts {} recalcs {}\n",
            range.rail_type,
            range.title,
            range.start,
            range.end,
            range.duration_ms(),
            fps,
            range.extended_info.forced_layouts,
            range.extended_info.forced_recalcs,
        ));
        for (origin, ms) in &range.extended_info.java_script {
            out.push_str(&format!("{:<10} {:>30} {:>10.1}ms\n", "", origin, ms));
        }
    }
    out
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.trace_path.as_os_str().is_empty() {
        anyhow::bail!("Trace path cannot be empty");
    }

    if !args.trace_path.is_file() {
        anyhow::bail!("Trace file not found: {}", args.trace_path.display());
    }

    if let Some(output) = &args.output_json {
        if output == &args.trace_path {
            anyhow::bail!("Refusing to overwrite the input trace with the report");
        }
    }

    Ok(())
}
