//! Aggregation of trace events into per-range metrics.
//!
//! This module turns the flat event sequence into:
//! - A span tree (immediate parent of every thread-scoped event)
//! - Frames per second
//! - Script CPU time per origin
//! - Forced layout / style recalculation counts

pub mod metrics;
pub mod stack_builder;

// Re-export main types and functions
pub use metrics::{
    attribute_forced_work, calculate_fps, calculate_script_time, find_forced_work, script_origin,
    ForcedCounts, ForcedKind, ForcedWork,
};
pub use stack_builder::{build_span_tree, SpanTree};
