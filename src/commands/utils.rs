use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!("  Ranges: {}", report.ranges.len());
    for range in &report.ranges {
        println!("    {} ({})", range.title, range.rail_type);
    }
    if !report.advisories.is_empty() {
        println!("  Advisories: {}", report.advisories.len());
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Rail Trace Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string             - Schema version (e.g., '1.0.0')");
        println!("  source: string              - Trace file analysed");
        println!("  ranges: array               - Time ranges in start order");
        println!("    title: string             - Range title");
        println!("    startMicros: number       - Absolute start (µs)");
        println!("    endMicros: number         - Absolute end (µs)");
        println!("    start: number             - Start relative to trace (ms)");
        println!("    end: number               - End relative to trace (ms)");
        println!("    type: string              - Response | Animation | Idle | Load");
        println!("    fps: number?              - Frames per second (null if unmeasured)");
        println!("    extendedInfo: object");
        println!("      javaScript: object      - Script time (ms) by origin");
        println!("      forcedRecalcs: number   - Style recalcs forced by script");
        println!("      forcedLayouts: number   - Layouts forced by script");
        println!("  advisories: array?          - Non-fatal notes");
        println!("  generatedAt: string         - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Rail Trace v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("RAIL performance analysis for Chrome trace-event captures.");
}
