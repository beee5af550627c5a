//! Result assembly: classified ranges plus metrics, in start order.

use super::ranges::ResolvedRange;
use crate::aggregator::{
    attribute_forced_work, build_span_tree, calculate_fps, calculate_script_time,
    find_forced_work,
};
use crate::parser::{ExtendedInfo, ParsedTrace, RailType, TimeRange};
use crate::utils::error::TraceError;
use log::debug;

/// Build the final range records
///
/// **Public** - main entry point of the assembler
///
/// # Arguments
/// * `trace` - Parsed trace
/// * `ranges` - Resolved ranges with their RAIL type, ordered by start
///
/// # Errors
/// * `TraceError::Internal` - a range reaches outside the trace bounds
///
/// The input order is kept as is.
pub fn assemble_ranges(
    trace: &ParsedTrace,
    ranges: &[(ResolvedRange, RailType)],
) -> Result<Vec<TimeRange>, TraceError> {
    for (range, _) in ranges {
        if !trace.bounds.contains(range.start, range.end) {
            return Err(TraceError::Internal(format!(
                "range '{}' [{}, {}] lies outside the trace [{}, {}]",
                range.title, range.start, range.end, trace.bounds.start, trace.bounds.end
            )));
        }
    }

    let tree = build_span_tree(&trace.events);
    let forced = find_forced_work(trace, &tree);
    let windows: Vec<(f64, f64)> = ranges.iter().map(|(r, _)| (r.start, r.end)).collect();
    let forced_counts = attribute_forced_work(&forced, &windows);

    let assembled = ranges
        .iter()
        .zip(forced_counts)
        .map(|((range, rail_type), forced)| {
            let fps = calculate_fps(trace, range.start, range.end);
            let java_script = calculate_script_time(trace, &tree, range.start, range.end)
                .into_iter()
                .filter(|(_, ms)| ms.is_finite())
                .collect();

            debug!(
                "Range '{}' ({}): fps {:?}, {} forced layouts, {} forced recalcs",
                range.title, rail_type, fps, forced.layouts, forced.recalcs
            );

            TimeRange {
                title: range.title.clone(),
                start_micros: range.start,
                end_micros: range.end,
                start: trace.relative_ms(range.start),
                end: trace.relative_ms(range.end),
                rail_type: *rail_type,
                fps: fps.filter(|f| f.is_finite()),
                extended_info: ExtendedInfo {
                    java_script,
                    forced_recalcs: forced.recalcs,
                    forced_layouts: forced.layouts,
                },
            }
        })
        .collect();

    Ok(assembled)
}
