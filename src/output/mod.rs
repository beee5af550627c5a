//! Output writers for analysis reports.
//!
//! Reports are written as pretty printed JSON and can be read back for
//! validation.

pub mod json;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
