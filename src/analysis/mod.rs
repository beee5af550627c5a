//! Trace analysis pipeline.
//!
//! Stages, each failing fast before the next runs:
//! 1. Load and validate the payload
//! 2. Extension guard (fatal in strict mode)
//! 3. Resolve time ranges
//! 4. Classify each range and aggregate its metrics
//! 5. Assemble the ordered result
//!
//! No stage mutates the event sequence, and nothing is cached between
//! calls: a `ParsedTrace` can be analysed concurrently with different
//! options.

pub mod assembler;
pub mod extensions;
pub mod rail;
pub mod ranges;

pub use assembler::assemble_ranges;
pub use extensions::{check_extensions, find_extension_markers};
pub use rail::classify;
pub use ranges::{find_marker_pairs, resolve_ranges, RangeSource, ResolvedRange};

use crate::parser::{parse_trace_str, parse_trace_value, Analysis, ParsedTrace, RailType};
use crate::utils::error::TraceError;
use log::info;
use serde_json::Value;
use std::collections::HashMap;

/// Options for one analysis call
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Treat extension activity as fatal
    pub strict: bool,

    /// Title -> RAIL type. Present (and non-empty) selects explicit mode.
    pub types: Option<HashMap<String, RailType>>,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_type(mut self, title: impl Into<String>, rail_type: RailType) -> Self {
        self.types
            .get_or_insert_with(HashMap::new)
            .insert(title.into(), rail_type);
        self
    }
}

/// Analyse a serialized trace
///
/// **Public** - entry point for textual payloads
///
/// # Errors
/// * `TraceError::InvalidInput` - empty or non-JSON payload
/// * `TraceError::NoProcesses` - no process in the trace
/// * `TraceError::ExtensionsDetected` - extensions ran and `strict` is set
/// * `TraceError::Internal` - broken internal invariant
pub fn analyze_trace_str(raw: &str, options: &AnalysisOptions) -> Result<Analysis, TraceError> {
    let trace = parse_trace_str(raw)?;
    analyze_parsed(&trace, options)
}

/// Analyse an already deserialized trace
///
/// **Public** - entry point for structured payloads
pub fn analyze_trace(raw: &Value, options: &AnalysisOptions) -> Result<Analysis, TraceError> {
    let trace = parse_trace_value(raw)?;
    analyze_parsed(&trace, options)
}

/// Analyse a trace that was parsed earlier
///
/// **Public** - lets callers reuse one parse for several option sets
pub fn analyze_parsed(trace: &ParsedTrace, options: &AnalysisOptions) -> Result<Analysis, TraceError> {
    let advisories: Vec<String> = check_extensions(trace, options.strict)?
        .into_iter()
        .collect();

    let types = options.types.as_ref();
    let classified: Vec<(ResolvedRange, RailType)> = resolve_ranges(trace, types)
        .into_iter()
        .map(|range| {
            let rail_type = classify(&range, trace, types);
            (range, rail_type)
        })
        .collect();

    let ranges = assemble_ranges(trace, &classified)?;
    info!("Analysed {} time ranges", ranges.len());

    Ok(Analysis { ranges, advisories })
}
