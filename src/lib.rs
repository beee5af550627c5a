//! Rail Trace
//!
//! RAIL performance analysis for Chrome trace-event captures: named time
//! ranges classified as Response, Animation, Idle or Load, with frames per
//! second, script CPU time by origin, and layout/style work forced by
//! script.
//!
//! ## Getting Started
//!
//! ```no_run
//! use rail_trace::analysis::{analyze_trace_str, AnalysisOptions};
//!
//! let raw = std::fs::read_to_string("load.json").unwrap();
//! let analysis = analyze_trace_str(&raw, &AnalysisOptions::new()).unwrap();
//! for range in &analysis.ranges {
//!     println!("{} {} {:?}", range.title, range.rail_type, range.fps);
//! }
//! ```
//!
//! The `rail-trace` binary wraps the same pipeline:
//!
//! ```bash
//! rail-trace analyze --trace load.json --summary
//! ```

pub mod aggregator;
pub mod analysis;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;

pub use analysis::{analyze_parsed, analyze_trace, analyze_trace_str, AnalysisOptions};
pub use parser::{Analysis, ExtendedInfo, RailType, TimeRange};
pub use utils::error::TraceError;
