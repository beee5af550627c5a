mod common;

use pretty_assertions::assert_eq;
use rail_trace::commands::{execute_analyze, validate_args, AnalyzeArgs};
use rail_trace::output::read_report;
use rail_trace::utils::config::SCHEMA_VERSION;
use rail_trace::RailType;
use tempfile::TempDir;

fn write_trace(dir: &TempDir, name: &str, trace: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string(trace).unwrap()).unwrap();
    path
}

#[test]
fn test_analyze_writes_report() {
    let dir = TempDir::new().unwrap();
    let trace_path = write_trace(&dir, "animation.json", &common::animation_trace());
    let output = dir.path().join("out").join("report.json");

    let args = AnalyzeArgs {
        trace_path,
        output_json: Some(output.clone()),
        ..Default::default()
    };
    validate_args(&args).unwrap();
    let report = execute_analyze(args).unwrap();

    let loaded = read_report(&output).unwrap();
    assert_eq!(loaded.version, SCHEMA_VERSION);
    assert_eq!(loaded.ranges.len(), report.ranges.len());
    assert_eq!(loaded.ranges[0].title, "sideNavAnimation");
    assert_eq!(loaded.ranges[0].rail_type, RailType::Animation);
    assert!(loaded.source.ends_with("animation.json"));
}

#[test]
fn test_report_uses_camel_case_fields() {
    let dir = TempDir::new().unwrap();
    let trace_path = write_trace(&dir, "layout.json", &common::forced_layout_trace());
    let output = dir.path().join("report.json");

    execute_analyze(AnalyzeArgs {
        trace_path,
        output_json: Some(output.clone()),
        ..Default::default()
    })
    .unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let range = &value["ranges"][0];
    assert_eq!(range["type"], "Idle");
    assert_eq!(range["extendedInfo"]["forcedLayouts"], 1);
    assert_eq!(range["extendedInfo"]["forcedRecalcs"], 1);
    assert!(range["fps"].is_null());
    assert!(value["generatedAt"].is_string());
    assert!(value.get("advisories").is_none());
}

#[test]
fn test_explicit_types_flow_through_command() {
    let dir = TempDir::new().unwrap();
    let trace_path = write_trace(&dir, "animation.json", &common::animation_trace());

    let mut args = AnalyzeArgs {
        trace_path,
        output_json: Some(dir.path().join("report.json")),
        ..Default::default()
    };
    args.types
        .insert("sideNavAnimation".to_string(), RailType::Response);

    let report = execute_analyze(args).unwrap();

    assert_eq!(report.ranges[0].rail_type, RailType::Response);
}

#[test]
fn test_strict_command_fails_on_extensions() {
    let dir = TempDir::new().unwrap();
    let trace_path = write_trace(&dir, "ext.json", &common::extension_trace());

    let result = execute_analyze(AnalyzeArgs {
        trace_path,
        output_json: Some(dir.path().join("report.json")),
        strict: true,
        ..Default::default()
    });

    assert!(result.is_err());
    assert!(!dir.path().join("report.json").exists());
}

#[test]
fn test_validate_args_rejects_missing_trace() {
    let dir = TempDir::new().unwrap();
    let args = AnalyzeArgs {
        trace_path: dir.path().join("missing.json"),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}
