//! RAIL classification of resolved ranges.

use super::ranges::{find_animation_runs, input_type, RangeSource, ResolvedRange};
use crate::parser::{ParsedTrace, RailType};
use crate::utils::config::NAVIGATION_START_NAMES;
use std::collections::HashMap;

/// Assign a RAIL type to a resolved range
///
/// **Public** - main entry point of the classifier
///
/// Precedence:
/// 1. the caller's explicit type for the title
/// 2. the heuristic that produced the range (Load / Response / Animation)
/// 3. a RAIL word at the end of a marker title (`sideNavAnimation`)
/// 4. the range content; the earliest starting evidence wins
/// 5. `Idle`
pub fn classify(
    range: &ResolvedRange,
    trace: &ParsedTrace,
    types: Option<&HashMap<String, RailType>>,
) -> RailType {
    if let Some(explicit) = types.and_then(|t| t.get(&range.title)) {
        return *explicit;
    }

    match range.source {
        RangeSource::Load => RailType::Load,
        RangeSource::Response => RailType::Response,
        RangeSource::Animation => RailType::Animation,
        RangeSource::Marker => title_hint(&range.title)
            .or_else(|| infer_from_content(range, trace))
            .unwrap_or(RailType::Idle),
    }
}

/// RAIL type named by the title's suffix, if any
pub fn title_hint(title: &str) -> Option<RailType> {
    RailType::ALL
        .into_iter()
        .find(|t| title.ends_with(t.as_str()))
}

/// Classify by the earliest marker inside the window
///
/// **Private** - content rule for named ranges
///
/// Candidates are a navigation start (Load), a user input (Response) and
/// the start of a qualifying frame run (Animation). When two start at the
/// same instant the order above decides.
fn infer_from_content(range: &ResolvedRange, trace: &ParsedTrace) -> Option<RailType> {
    let (start, end) = (range.start, range.end);
    let in_window = || trace.events.iter().filter(move |e| e.within(start, end));

    let navigation = in_window()
        .find(|e| NAVIGATION_START_NAMES.contains(&e.name.as_str()))
        .map(|e| (e.ts, RailType::Load));

    let input = in_window()
        .find(|e| input_type(e).is_some())
        .map(|e| (e.ts, RailType::Response));

    let frames: Vec<f64> = trace
        .frame_swaps()
        .filter(|e| e.within(start, end))
        .map(|e| e.ts)
        .collect();
    let animation = find_animation_runs(&frames)
        .first()
        .map(|(start, _)| (*start, RailType::Animation));

    [navigation, input, animation]
        .into_iter()
        .flatten()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, rail_type)| rail_type)
}
