//! Range resolution: which time windows get analysed.
//!
//! Two modes:
//! - **Explicit**: the caller names the ranges it wants (title -> RAIL
//!   type) and each title is matched against begin/end marker pairs
//!   (`console.time`/`console.timeEnd`, `performance.measure`).
//! - **Inferred**: heuristics over navigation, input and frame events, plus
//!   every marker pair. A marker pair whose window contains an inferred
//!   range replaces it: the page author already labelled that region.

use crate::parser::{ParsedTrace, Phase, RailType, TraceEvent};
use crate::utils::config::{
    ANIMATION_MAX_FRAME_GAP_MICROS, ANIMATION_MIN_FRAMES, INPUT_DISPATCH_NAME, INPUT_EVENT_TYPES,
    INPUT_LATENCY_PREFIX, LOAD_END_NAMES, LOAD_RANGE_TITLE, MARKER_CATEGORIES,
    NAVIGATION_START_NAMES,
};
use log::debug;
use std::collections::{BTreeSet, HashMap};

/// What produced a resolved range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSource {
    /// A named begin/end marker pair
    Marker,
    /// navigation start through load end
    Load,
    /// input through the next presented frame
    Response,
    /// a sustained run of presented frames
    Animation,
}

/// A time window to analyse, before classification and metrics
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRange {
    pub title: String,
    pub start: f64,
    pub end: f64,
    pub source: RangeSource,
}

/// A matched begin/end marker pair
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPair {
    pub title: String,
    pub start: f64,
    pub end: f64,
}

/// Resolve the ranges to analyse, ordered by start time
///
/// **Public** - main entry point of the range resolver
///
/// `types` selects explicit mode. An empty mapping is treated like no
/// mapping. No range at all is a valid (empty) result.
pub fn resolve_ranges(
    trace: &ParsedTrace,
    types: Option<&HashMap<String, RailType>>,
) -> Vec<ResolvedRange> {
    let pairs = find_marker_pairs(&trace.events);

    let mut ranges: Vec<ResolvedRange> = match types.filter(|t| !t.is_empty()) {
        Some(types) => {
            for title in types.keys() {
                if !pairs.iter().any(|p| &p.title == title) {
                    debug!("No marker pair for requested range '{}'", title);
                }
            }
            pairs
                .into_iter()
                .filter(|p| types.contains_key(&p.title))
                .map(ResolvedRange::from_marker)
                .collect()
        }
        None => {
            let mut ranges: Vec<ResolvedRange> = infer_ranges(trace)
                .into_iter()
                .filter(|range| match pairs.iter().find(|p| p.covers(range)) {
                    Some(pair) => {
                        debug!("'{}' supersedes inferred '{}'", pair.title, range.title);
                        false
                    }
                    None => true,
                })
                .collect();
            ranges.extend(pairs.into_iter().map(ResolvedRange::from_marker));
            ranges
        }
    };

    // Stable: ranges with equal windows keep discovery order
    ranges.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));

    debug!("Resolved {} time ranges", ranges.len());
    ranges
}

impl ResolvedRange {
    fn from_marker(pair: MarkerPair) -> Self {
        Self {
            title: pair.title,
            start: pair.start,
            end: pair.end,
            source: RangeSource::Marker,
        }
    }
}

impl MarkerPair {
    /// Whether the pair's window contains the whole of `range`
    fn covers(&self, range: &ResolvedRange) -> bool {
        self.start <= range.start && range.end <= self.end
    }
}

fn is_marker_event(event: &TraceEvent) -> bool {
    MARKER_CATEGORIES.iter().any(|c| event.has_category(c))
}

/// Pairing key: async markers pair by id, thread markers by thread
type MarkerKey = (Option<u64>, String, Option<String>, Option<u64>);

fn marker_key(event: &TraceEvent) -> MarkerKey {
    let tid = matches!(event.phase, Phase::Begin | Phase::End).then_some(event.tid);
    (event.pid, event.name.clone(), event.id.clone(), tid)
}

/// Match begin/end marker events into named windows
///
/// **Public** - used by the resolver and by tests
///
/// Repeated markers with one title nest like a stack (innermost pairs
/// first). Unclosed begins and unmatched ends produce nothing.
pub fn find_marker_pairs(events: &[TraceEvent]) -> Vec<MarkerPair> {
    let mut open: HashMap<MarkerKey, Vec<f64>> = HashMap::new();
    let mut pairs = Vec::new();

    for event in events.iter().filter(|e| is_marker_event(e)) {
        if event.phase.is_begin() {
            open.entry(marker_key(event)).or_default().push(event.ts);
        } else if event.phase.is_end() {
            match open.get_mut(&marker_key(event)).and_then(Vec::pop) {
                Some(start) => pairs.push(MarkerPair {
                    title: event.name.clone(),
                    start,
                    end: event.ts,
                }),
                None => debug!("Marker end '{}' without a begin", event.name),
            }
        }
    }

    pairs.sort_by(|a, b| a.start.total_cmp(&b.start));
    pairs
}

/// Heuristic ranges for traces that carry no marker pairs
///
/// **Private** - inferred mode fallback
fn infer_ranges(trace: &ParsedTrace) -> Vec<ResolvedRange> {
    let mut ranges = Vec::new();

    let load = find_load_window(&trace.events);
    if let Some((start, end)) = load {
        ranges.push(ResolvedRange {
            title: LOAD_RANGE_TITLE.to_string(),
            start,
            end,
            source: RangeSource::Load,
        });
    }

    let frames: Vec<f64> = trace.frame_swaps().map(|e| e.ts).collect();
    let (responses, closing_frames) = find_response_windows(&trace.events, &frames);
    ranges.extend(responses);

    let animation_frames: Vec<f64> = frames
        .iter()
        .enumerate()
        .filter(|(i, _)| !closing_frames.contains(i))
        .map(|(_, ts)| *ts)
        .filter(|ts| !load.is_some_and(|(start, end)| *ts >= start && *ts <= end))
        .collect();

    ranges.extend(
        find_animation_runs(&animation_frames)
            .into_iter()
            .map(|(start, end)| ResolvedRange {
                title: RailType::Animation.to_string(),
                start,
                end,
                source: RangeSource::Animation,
            }),
    );

    ranges
}

/// First navigation start and the first load end at or after it
pub fn find_load_window(events: &[TraceEvent]) -> Option<(f64, f64)> {
    let nav = events
        .iter()
        .find(|e| NAVIGATION_START_NAMES.contains(&e.name.as_str()))?;
    let load_end = events
        .iter()
        .find(|e| e.ts >= nav.ts && LOAD_END_NAMES.contains(&e.name.as_str()))?;
    Some((nav.ts, load_end.ts))
}

/// Input type of a user input event, `None` for any other event
///
/// `EventDispatch` reports the DOM event type; `InputLatency::*` events
/// carry it in their name. Async end phases are skipped so one input
/// is not seen twice.
pub fn input_type(event: &TraceEvent) -> Option<&str> {
    if event.name == INPUT_DISPATCH_NAME {
        return event
            .arg_str(&["data", "type"])
            .filter(|t| INPUT_EVENT_TYPES.contains(t));
    }

    if event.phase.is_end() {
        return None;
    }
    event.name.strip_prefix(INPUT_LATENCY_PREFIX)
}

/// Pair user input with the first frame presented after it
///
/// **Private** - Response heuristic
///
/// Inputs answered by the same frame collapse into one window starting at
/// the earliest of them. Returns the windows and the indices (into
/// `frames`) of the frames that closed them.
fn find_response_windows(
    events: &[TraceEvent],
    frames: &[f64],
) -> (Vec<ResolvedRange>, BTreeSet<usize>) {
    let mut ranges: Vec<ResolvedRange> = Vec::new();
    let mut closing = BTreeSet::new();

    for event in events {
        let Some(kind) = input_type(event) else {
            continue;
        };
        let next_frame = frames.partition_point(|ts| *ts <= event.ts);
        let Some(frame_ts) = frames.get(next_frame).copied() else {
            continue;
        };

        if !closing.insert(next_frame) {
            // Same frame answers an earlier input
            continue;
        }
        let title = if kind.is_empty() {
            RailType::Response.to_string()
        } else {
            format!("{}{}", kind, RailType::Response)
        };
        ranges.push(ResolvedRange {
            title,
            start: event.ts,
            end: frame_ts,
            source: RangeSource::Response,
        });
    }

    (ranges, closing)
}

/// Split frame timestamps into animation runs
///
/// **Public** - shared by the resolver and the classifier
///
/// A run continues while consecutive frames are at most
/// `ANIMATION_MAX_FRAME_GAP_MICROS` apart and counts as an animation once
/// it holds `ANIMATION_MIN_FRAMES` frames. Returns `(first, last)` frame
/// timestamps of each qualifying run.
pub fn find_animation_runs(frames: &[f64]) -> Vec<(f64, f64)> {
    let mut runs = Vec::new();
    let mut run_start = 0;

    for i in 1..=frames.len() {
        let run_ends = i == frames.len() || frames[i] - frames[i - 1] > ANIMATION_MAX_FRAME_GAP_MICROS;
        if !run_ends {
            continue;
        }
        if i - run_start >= ANIMATION_MIN_FRAMES {
            runs.push((frames[run_start], frames[i - 1]));
        }
        run_start = i;
    }

    runs
}
