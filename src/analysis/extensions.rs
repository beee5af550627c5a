//! Detection of browser extensions that ran while the trace was recorded.
//!
//! Extension script skews every metric the analyzer reports, so strict
//! callers refuse such traces outright.

use crate::parser::{ParsedTrace, TraceEvent};
use crate::utils::config::{
    EXTENSIONS_REMEDIATION, EXTENSION_EVENT_PREFIX, EXTENSION_URL_PATHS, EXTENSION_URL_SCHEMES,
};
use crate::utils::error::TraceError;
use log::{debug, warn};

/// Whether an event was emitted by, or on behalf of, an extension
pub fn is_extension_event(event: &TraceEvent) -> bool {
    if event.name.starts_with(EXTENSION_EVENT_PREFIX) {
        return true;
    }

    EXTENSION_URL_PATHS
        .iter()
        .filter_map(|path| event.arg_str(path))
        .any(|url| {
            EXTENSION_URL_SCHEMES
                .iter()
                .any(|scheme| url.starts_with(scheme))
        })
}

/// All extension markers, in timestamp order
///
/// **Public** - exposed for callers that want to report the offenders
pub fn find_extension_markers(trace: &ParsedTrace) -> Vec<&TraceEvent> {
    trace
        .events
        .iter()
        .filter(|e| is_extension_event(e))
        .collect()
}

/// Apply the extension policy
///
/// **Public** - runs before any range resolution
///
/// # Returns
/// * `Ok(None)` - no extension activity
/// * `Ok(Some(note))` - extension activity, non-strict: advisory note
///
/// # Errors
/// * `TraceError::ExtensionsDetected` - extension activity in strict mode
pub fn check_extensions(trace: &ParsedTrace, strict: bool) -> Result<Option<String>, TraceError> {
    let markers = find_extension_markers(trace);
    if markers.is_empty() {
        return Ok(None);
    }

    debug!(
        "{} extension events, first: '{}' at {}",
        markers.len(),
        markers[0].name,
        markers[0].ts
    );

    if strict {
        return Err(TraceError::ExtensionsDetected(
            EXTENSIONS_REMEDIATION.to_string(),
        ));
    }

    warn!("{}", EXTENSIONS_REMEDIATION);
    Ok(Some(EXTENSIONS_REMEDIATION.to_string()))
}
