//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors surfaced by trace analysis
///
/// Every variant is terminal for the current analysis call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraceError {
    /// Payload missing or not the expected structured form.
    /// The payload itself is never echoed into the message.
    #[error("Invalid trace contents; {0}")]
    InvalidInput(String),

    #[error("Zero processes (tabs) found.")]
    NoProcesses,

    #[error("{0}")]
    ExtensionsDetected(String),

    /// A broken internal invariant, not a problem with the input
    #[error("Internal analysis failure: {0}")]
    Internal(String),
}

/// Errors from reading or writing report files
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Cannot write report: {0}")]
    WriteFailed(std::io::Error),

    #[error("Cannot read report: {0}")]
    ReadFailed(std::io::Error),

    #[error("Report is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Not a file path: {0}")]
    InvalidPath(String),
}
