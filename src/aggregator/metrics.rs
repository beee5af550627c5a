//! Per-range performance metrics.
//!
//! Every aggregator is a read-only pass over the shared event slice:
//! - frames per second from renderer frame presentations
//! - script CPU time grouped by origin
//! - layout and style work forced synchronously by script

use super::stack_builder::SpanTree;
use crate::parser::{ParsedTrace, Phase, TraceEvent};
use crate::utils::config::{
    LAYOUT_EVENT_NAMES, MICROS_PER_MILLI, MICROS_PER_SECOND, RECALC_STYLE_EVENT_NAMES,
    SCRIPT_EVENT_NAMES, SCRIPT_URL_PATHS,
};
use log::debug;
use std::collections::BTreeMap;
use url::Url;

/// Frames per second over `[start, end]` (microseconds)
///
/// **Public** - FPS aggregator
///
/// Only the renderer's frame presentations are counted. Returns `None`
/// when the window has no duration, no frame was presented, or the
/// result would not be finite: "unmeasured" is not the same as zero.
pub fn calculate_fps(trace: &ParsedTrace, start: f64, end: f64) -> Option<f64> {
    let seconds = (end - start) / MICROS_PER_SECOND;
    if seconds <= 0.0 {
        return None;
    }

    let frames = trace.frame_swaps().filter(|e| e.within(start, end)).count();
    if frames == 0 {
        return None;
    }

    Some(frames as f64 / seconds).filter(|fps| fps.is_finite())
}

pub fn is_script_event(event: &TraceEvent) -> bool {
    SCRIPT_EVENT_NAMES.contains(&event.name.as_str())
}

/// Origin (URL host, with a non-default port) a script event came from
///
/// **Public** - used by the script aggregator and its tests
///
/// Returns `None` when no URL is recorded or it has no host.
pub fn script_origin(event: &TraceEvent) -> Option<String> {
    let raw = SCRIPT_URL_PATHS
        .iter()
        .filter_map(|path| event.arg_str(path))
        .find(|url| !url.is_empty())?;

    let url = Url::parse(raw).ok()?;
    let host = url.host_str().filter(|h| !h.is_empty())?;

    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Script CPU time in milliseconds per origin over `[start, end]`
///
/// **Public** - Script-origin CPU aggregator
///
/// Durations are summed per event, so nested script events under one
/// origin both count: this is CPU-busy time, not wall-clock span.
/// Events without an origin are left out entirely.
pub fn calculate_script_time(
    trace: &ParsedTrace,
    tree: &SpanTree,
    start: f64,
    end: f64,
) -> BTreeMap<String, f64> {
    let mut by_origin: BTreeMap<String, f64> = BTreeMap::new();

    for (index, event) in trace.events.iter().enumerate() {
        if event.pid.is_none() || event.pid != trace.renderer_pid {
            continue;
        }
        if !is_script_event(event) || !event.within(start, end) {
            continue;
        }
        let Some(duration) = tree.duration_of(index) else {
            continue;
        };
        let Some(origin) = script_origin(event) else {
            continue;
        };

        *by_origin.entry(origin).or_insert(0.0) += duration;
    }

    by_origin
        .into_iter()
        .map(|(origin, micros)| (origin, micros / MICROS_PER_MILLI))
        .collect()
}

/// Kind of rendering work script forced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedKind {
    Layout,
    StyleRecalc,
}

/// One forced layout or style recalculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForcedWork {
    pub index: usize,
    pub ts: f64,
    pub kind: ForcedKind,
}

fn forced_kind(event: &TraceEvent) -> Option<ForcedKind> {
    let name = event.name.as_str();
    if LAYOUT_EVENT_NAMES.contains(&name) {
        Some(ForcedKind::Layout)
    } else if RECALC_STYLE_EVENT_NAMES.contains(&name) {
        Some(ForcedKind::StyleRecalc)
    } else {
        None
    }
}

/// Find layout and style spans whose immediate parent is a script event
///
/// **Public** - first half of the forced-work aggregator
///
/// Work scheduled by the rendering pipeline has a non-script parent (or
/// none at all) and is not reported. What sits above the script parent
/// does not matter. A script `B` that never saw its `E` (trace cut off
/// mid-call) has no known extent, so nothing under it counts.
pub fn find_forced_work(trace: &ParsedTrace, tree: &SpanTree) -> Vec<ForcedWork> {
    let forced: Vec<ForcedWork> = trace
        .events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e.phase, Phase::Complete | Phase::Begin))
        .filter_map(|(index, event)| {
            let kind = forced_kind(event)?;
            let parent = tree.parent_of(index)?;
            tree.duration_of(parent)?;
            is_script_event(&trace.events[parent]).then_some(ForcedWork {
                index,
                ts: event.ts,
                kind,
            })
        })
        .collect();

    debug!("Found {} forced layout/style events", forced.len());
    forced
}

/// Forced work counts for one range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForcedCounts {
    pub layouts: u32,
    pub recalcs: u32,
}

/// Attribute forced work to windows (sorted by start)
///
/// **Public** - second half of the forced-work aggregator
///
/// Each event goes to the first window containing it, so overlapping
/// windows never count the same event twice.
pub fn attribute_forced_work(forced: &[ForcedWork], windows: &[(f64, f64)]) -> Vec<ForcedCounts> {
    let mut counts = vec![ForcedCounts::default(); windows.len()];

    for work in forced {
        let Some(slot) = windows
            .iter()
            .position(|(start, end)| work.ts >= *start && work.ts <= *end)
        else {
            continue;
        };
        match work.kind {
            ForcedKind::Layout => counts[slot].layouts += 1,
            ForcedKind::StyleRecalc => counts[slot].recalcs += 1,
        }
    }

    counts
}
