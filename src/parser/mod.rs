//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Parsing raw Chrome trace-event JSON
//! - Validating the payload and discovering processes
//! - Defining the output schema

pub mod event;
pub mod schema;
pub mod trace;

// Re-export main types
pub use event::{Phase, TraceEvent};
pub use schema::{Analysis, ExtendedInfo, RailType, Report, TimeRange};
pub use trace::{parse_trace_str, parse_trace_value, ParsedTrace, Process, TraceBounds};
