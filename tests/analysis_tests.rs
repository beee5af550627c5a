mod common;

use pretty_assertions::assert_eq;
use rail_trace::analysis::{analyze_parsed, analyze_trace, analyze_trace_str, AnalysisOptions};
use rail_trace::parser::parse_trace_value;
use rail_trace::{RailType, TimeRange, TraceError};
use serde_json::{json, Value};

fn analyze(trace: &Value) -> Vec<TimeRange> {
    analyze_trace(trace, &AnalysisOptions::new()).unwrap().ranges
}

#[test]
fn test_null_payload_is_invalid_input() {
    let err = analyze_trace(&Value::Null, &AnalysisOptions::new()).unwrap_err();
    assert!(matches!(err, TraceError::InvalidInput(_)));

    let err = analyze_trace_str("", &AnalysisOptions::new()).unwrap_err();
    assert!(matches!(err, TraceError::InvalidInput(_)));
}

#[test]
fn test_non_json_payload_is_invalid_input() {
    let err = analyze_trace_str("wobble", &AnalysisOptions::new()).unwrap_err();
    assert!(matches!(err, TraceError::InvalidInput(_)));
    assert_eq!(err.to_string(), "Invalid trace contents; not JSON");
}

#[test]
fn test_processless_trace() {
    let err = analyze_trace(&json!({"traceEvents": []}), &AnalysisOptions::new()).unwrap_err();
    assert_eq!(err, TraceError::NoProcesses);
    assert_eq!(err.to_string(), "Zero processes (tabs) found.");
}

#[test]
fn test_strict_mode_rejects_extensions() {
    let options = AnalysisOptions::new().with_strict(true);

    let err = analyze_trace(&common::extension_trace(), &options).unwrap_err();

    assert!(matches!(err, TraceError::ExtensionsDetected(_)));
    assert!(err.to_string().starts_with("Extensions running during capture"));
}

#[test]
fn test_non_strict_mode_keeps_ranges_and_notes_extensions() {
    let clean = analyze(&common::load_trace());
    let analysis = analyze_trace(&common::extension_trace(), &AnalysisOptions::new()).unwrap();

    assert_eq!(analysis.advisories.len(), 1);
    let titles: Vec<_> = analysis.ranges.iter().map(|r| r.title.as_str()).collect();
    let clean_titles: Vec<_> = clean.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, clean_titles);
}

#[test]
fn test_load_inferred() {
    let ranges = analyze(&common::load_trace());

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].title, "Load");
    assert_eq!(ranges[0].rail_type, RailType::Load);
    assert_eq!(ranges[0].fps, None);
}

#[test]
fn test_js_breakdown_by_origin() {
    let ranges = analyze(&common::load_trace());
    let js = &ranges[0].extended_info.java_script;

    assert_eq!(js.len(), 2);
    assert!(js["localhost:11080"] > 245.0 && js["localhost:11080"] < 246.0);
    assert!(js["www.google-analytics.com"] > 59.0 && js["www.google-analytics.com"] < 60.0);
}

#[test]
fn test_timed_range_window() {
    let ranges = analyze(&common::animation_trace());

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].title, "sideNavAnimation");
    assert_eq!(ranges[0].start, 0.0);
    assert!(ranges[0].end > 1179.0 && ranges[0].end < 1180.0);
    assert_eq!(ranges[0].start_micros, 1_000_000.0);
}

#[test]
fn test_animation_fps() {
    let ranges = analyze(&common::animation_trace());
    let fps = ranges[0].fps.unwrap();

    assert!(fps > 59.0 && fps < 61.0, "fps was {}", fps);
}

#[test]
fn test_animation_inferred_from_title_and_content() {
    assert_eq!(analyze(&common::animation_trace())[0].rail_type, RailType::Animation);

    let ranges = analyze(&common::untitled_animation_trace());
    assert_eq!(ranges[0].title, "sideNav");
    assert_eq!(ranges[0].rail_type, RailType::Animation);
}

#[test]
fn test_explicit_type_is_honoured() {
    let trace = common::animation_trace();

    let options = AnalysisOptions::new().with_type("sideNavAnimation", RailType::Animation);
    let ranges = analyze_trace(&trace, &options).unwrap().ranges;
    assert_eq!(ranges[0].rail_type, RailType::Animation);

    let options = AnalysisOptions::new().with_type("sideNavAnimation", RailType::Idle);
    let ranges = analyze_trace(&trace, &options).unwrap().ranges;
    assert_eq!(ranges[0].rail_type, RailType::Idle);
}

#[test]
fn test_explicit_mode_missing_title_yields_nothing() {
    let options = AnalysisOptions::new().with_type("notInTrace", RailType::Response);

    let analysis = analyze_trace(&common::animation_trace(), &options).unwrap();

    assert!(analysis.ranges.is_empty());
}

#[test]
fn test_response_then_animation() {
    let ranges = analyze(&common::response_animation_trace());

    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0].rail_type, RailType::Response);
    assert_eq!(ranges[0].title, "clickResponse");
    assert_eq!(ranges[1].rail_type, RailType::Animation);
    assert!(ranges[0].start_micros < ranges[1].start_micros);
}

#[test]
fn test_ranges_sorted_by_start() {
    for trace in [
        common::response_animation_trace(),
        common::forced_layout_trace(),
        common::load_trace(),
    ] {
        let ranges = analyze(&trace);
        assert!(ranges
            .windows(2)
            .all(|pair| pair[0].start_micros <= pair[1].start_micros));
    }
}

#[test]
fn test_measures_do_not_hide_inferred_ranges() {
    let ranges = analyze(&common::mixed_trace());

    let found: Vec<_> = ranges
        .iter()
        .map(|r| (r.title.as_str(), r.rail_type))
        .collect();
    assert_eq!(
        found,
        vec![
            ("Load", RailType::Load),
            ("analytics-init", RailType::Idle),
            ("clickResponse", RailType::Response),
            ("Animation", RailType::Animation),
        ]
    );
}

#[test]
fn test_marker_replaces_inferred_range_it_contains() {
    // The sideNav marker spans the whole frame run, so no separate
    // "Animation" range is produced for it
    let ranges = analyze(&common::untitled_animation_trace());

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].title, "sideNav");
}

#[test]
fn test_forced_layout_and_recalc() {
    let ranges = analyze(&common::forced_layout_trace());

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].rail_type, RailType::Idle);
    assert_eq!(ranges[0].extended_info.forced_layouts, 1);
    assert_eq!(ranges[0].extended_info.forced_recalcs, 1);
}

#[test]
fn test_output_round_trips_through_json() {
    let ranges = analyze(&common::animation_trace());

    let text = serde_json::to_string(&ranges).unwrap();
    assert!(!text.contains("NaN") && !text.contains("Infinity"));

    let reparsed: Vec<TimeRange> = serde_json::from_str(&text).unwrap();
    assert_eq!(reparsed, ranges);
}

#[test]
fn test_parsed_trace_reused_with_different_options() {
    let trace = parse_trace_value(&common::animation_trace()).unwrap();

    let inferred = analyze_parsed(&trace, &AnalysisOptions::new()).unwrap();
    let explicit = analyze_parsed(
        &trace,
        &AnalysisOptions::new().with_type("sideNavAnimation", RailType::Response),
    )
    .unwrap();

    assert_eq!(inferred.ranges[0].rail_type, RailType::Animation);
    assert_eq!(explicit.ranges[0].rail_type, RailType::Response);
    assert_eq!(inferred.ranges[0].fps, explicit.ranges[0].fps);
}
