//! Trace loader and validator.
//!
//! Turns a raw payload (text or already-parsed JSON) into a timestamp ordered
//! event sequence plus the derived process view the metrics need.
//! Two payload shapes are accepted:
//! - JSON array format: `[{...}, {...}]`
//! - JSON object format: `{"traceEvents": [...], ...}`

use super::event::TraceEvent;
use crate::utils::config::{
    FRAME_SWAP_NAMES, PROCESS_NAME_METADATA, RENDERER_PROCESS_NAME, TRACE_EVENTS_FIELD,
    TRACING_STARTED_NAMES,
};
use crate::utils::error::TraceError;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One process seen in the trace (derived, never persisted)
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub pid: u64,

    /// From the `process_name` metadata event, when present
    pub name: Option<String>,

    pub event_count: usize,
}

/// Time span covered by the non-metadata events, in microseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceBounds {
    pub start: f64,
    pub end: f64,
}

impl TraceBounds {
    pub fn contains(&self, start: f64, end: f64) -> bool {
        start >= self.start && end <= self.end && start <= end
    }
}

/// Parsed, validated trace (read-only after construction)
#[derive(Debug, Clone)]
pub struct ParsedTrace {
    /// Events sorted by timestamp; ties keep payload order
    pub events: Vec<TraceEvent>,

    /// Processes ordered by pid
    pub processes: Vec<Process>,

    /// Process hosting the page, used to scope frame and script metrics
    pub renderer_pid: Option<u64>,

    /// The frame presentation event name counted in this trace
    pub frame_swap_name: Option<&'static str>,

    pub bounds: TraceBounds,
}

impl ParsedTrace {
    /// Events emitted by the renderer process
    pub fn renderer_events(&self) -> impl Iterator<Item = &TraceEvent> + '_ {
        let pid = self.renderer_pid;
        self.events
            .iter()
            .filter(move |e| pid.is_some() && e.pid == pid)
    }

    /// Frame presentation events of the renderer process, in timestamp order
    pub fn frame_swaps(&self) -> impl Iterator<Item = &TraceEvent> + '_ {
        let name = self.frame_swap_name;
        self.renderer_events()
            .filter(move |e| Some(e.name.as_str()) == name)
    }

    /// Convert an absolute timestamp into milliseconds since trace start
    pub fn relative_ms(&self, ts: f64) -> f64 {
        (ts - self.bounds.start) / crate::utils::config::MICROS_PER_MILLI
    }
}

/// Parse a serialized trace
///
/// **Public** - main entry point for textual payloads
///
/// # Errors
/// * `TraceError::InvalidInput` - empty payload or not JSON
/// * `TraceError::NoProcesses` - valid JSON without any process id
pub fn parse_trace_str(raw: &str) -> Result<ParsedTrace, TraceError> {
    if raw.trim().is_empty() {
        return Err(TraceError::InvalidInput("trace payload is empty".to_string()));
    }

    // serde's message is dropped on purpose: it can quote payload text
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        debug!("Trace JSON rejected at line {}, column {}", e.line(), e.column());
        TraceError::InvalidInput("not JSON".to_string())
    })?;

    parse_trace_value(&value)
}

/// Parse an already deserialized trace
///
/// **Public** - main entry point for structured payloads
pub fn parse_trace_value(raw: &Value) -> Result<ParsedTrace, TraceError> {
    let raw_events = extract_event_array(raw)?;
    let mut events = parse_events(raw_events)?;

    // Stable: equal timestamps keep payload order
    events.sort_by(|a, b| a.ts.total_cmp(&b.ts));

    let processes = collect_processes(&events);
    if processes.is_empty() {
        return Err(TraceError::NoProcesses);
    }

    let renderer_pid = find_renderer_pid(&events, &processes);
    let frame_swap_name = select_frame_swap_name(&events, renderer_pid);
    let bounds = compute_bounds(&events);

    debug!(
        "Parsed {} events across {} processes (renderer: {:?}, frames: {:?})",
        events.len(),
        processes.len(),
        renderer_pid,
        frame_swap_name
    );

    Ok(ParsedTrace {
        events,
        processes,
        renderer_pid,
        frame_swap_name,
        bounds,
    })
}

/// Locate the event array in either payload shape
///
/// **Private** - internal helper for parse_trace_value
fn extract_event_array(raw: &Value) -> Result<&[Value], TraceError> {
    match raw {
        Value::Null => Err(TraceError::InvalidInput("trace payload is missing".to_string())),
        Value::Array(events) => Ok(events.as_slice()),
        Value::Object(obj) => obj
            .get(TRACE_EVENTS_FIELD)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                TraceError::InvalidInput(format!(
                    "trace object has no '{}' array",
                    TRACE_EVENTS_FIELD
                ))
            }),
        _ => Err(TraceError::InvalidInput(
            "trace must be a JSON array or object".to_string(),
        )),
    }
}

/// Deserialize every event, skipping malformed records
///
/// **Private** - internal parsing logic
fn parse_events(raw_events: &[Value]) -> Result<Vec<TraceEvent>, TraceError> {
    let mut events = Vec::with_capacity(raw_events.len());

    for (index, raw_event) in raw_events.iter().enumerate() {
        match TraceEvent::deserialize(raw_event) {
            Ok(event) => events.push(event),
            Err(e) => {
                // Log but don't fail - some producers emit odd records
                warn!("Skipping malformed trace event {}: {}", index, e);
            }
        }
    }

    if events.is_empty() && !raw_events.is_empty() {
        return Err(TraceError::InvalidInput(
            "no trace event could be parsed".to_string(),
        ));
    }

    Ok(events)
}

fn collect_processes(events: &[TraceEvent]) -> Vec<Process> {
    let mut by_pid: BTreeMap<u64, Process> = BTreeMap::new();

    for event in events {
        let Some(pid) = event.pid else {
            continue;
        };
        let process = by_pid.entry(pid).or_insert_with(|| Process {
            pid,
            name: None,
            event_count: 0,
        });
        process.event_count += 1;

        if event.is_metadata() && event.name == PROCESS_NAME_METADATA {
            if let Some(name) = event.arg_str(&["name"]) {
                process.name = Some(name.to_string());
            }
        }
    }

    by_pid.into_values().collect()
}

/// Pick the process hosting the page
///
/// Tried in order: the `TracingStartedInPage` pid, the busiest process named
/// `Renderer`, the process with most frame presentations, the busiest process.
fn find_renderer_pid(events: &[TraceEvent], processes: &[Process]) -> Option<u64> {
    if let Some(pid) = events
        .iter()
        .find(|e| TRACING_STARTED_NAMES.contains(&e.name.as_str()))
        .and_then(|e| e.pid)
    {
        return Some(pid);
    }

    if let Some(process) = processes
        .iter()
        .filter(|p| p.name.as_deref() == Some(RENDERER_PROCESS_NAME))
        .max_by_key(|p| p.event_count)
    {
        return Some(process.pid);
    }

    let mut frame_counts: BTreeMap<u64, usize> = BTreeMap::new();
    for event in events {
        if let Some(pid) = event.pid {
            if FRAME_SWAP_NAMES.contains(&event.name.as_str()) {
                *frame_counts.entry(pid).or_insert(0) += 1;
            }
        }
    }
    if let Some((pid, _)) = frame_counts.into_iter().max_by_key(|(_, count)| *count) {
        return Some(pid);
    }

    processes
        .iter()
        .max_by_key(|p| p.event_count)
        .map(|p| p.pid)
}

fn select_frame_swap_name(events: &[TraceEvent], renderer_pid: Option<u64>) -> Option<&'static str> {
    let renderer_pid = renderer_pid?;
    FRAME_SWAP_NAMES.iter().copied().find(|name| {
        events
            .iter()
            .any(|e| e.pid == Some(renderer_pid) && e.name == *name)
    })
}

fn compute_bounds(events: &[TraceEvent]) -> TraceBounds {
    let mut timed = events.iter().filter(|e| !e.is_metadata()).peekable();
    if timed.peek().is_none() {
        return TraceBounds { start: 0.0, end: 0.0 };
    }

    let (start, end) = timed.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
        (lo.min(e.ts), hi.max(e.end_micros()))
    });
    TraceBounds { start, end }
}
