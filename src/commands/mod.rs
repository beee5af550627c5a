//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod analyze;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analyze, generate_text_summary, validate_args};
pub use models::{parse_type_binding, AnalyzeArgs};
pub use utils::{display_schema, display_version, validate_report_file};
