//! Report files.
//!
//! The CLI keeps one `Report` per analysed trace as pretty JSON and reads
//! it back for `validate`. Nothing in here feeds the analysis.

use crate::parser::schema::Report;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Render a report the way it is stored and printed
pub fn report_to_string(report: &Report) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Store a report, creating missing parent directories
///
/// **Public** - used by `analyze --output`
///
/// # Errors
/// * `OutputError::InvalidPath` - `path` names a directory
/// * `OutputError::WriteFailed` - directory creation or the write failed
pub fn write_report(report: &Report, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let path = path.as_ref();
    if path.is_dir() {
        return Err(OutputError::InvalidPath(path.display().to_string()));
    }

    let text = report_to_string(report)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(OutputError::WriteFailed)?;
    }
    fs::write(path, text).map_err(OutputError::WriteFailed)?;

    debug!("Stored {} ranges in {}", report.ranges.len(), path.display());
    Ok(())
}

/// Load a stored report
///
/// **Public** - used by `validate`
///
/// A report from another schema version still loads; it is only flagged.
pub fn read_report(path: impl AsRef<Path>) -> Result<Report, OutputError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(OutputError::ReadFailed)?;
    let report: Report = serde_json::from_str(&text)?;

    if report.version != SCHEMA_VERSION {
        warn!(
            "{} uses report schema {}, this build writes {}",
            path.display(),
            report.version,
            SCHEMA_VERSION
        );
    }

    Ok(report)
}
