//! Configuration and constants for trace analysis.
//!
//! Event names follow the Chrome trace-event vocabulary. Browser versions
//! rename events from time to time, so most lookups accept a short list.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

pub const MICROS_PER_MILLI: f64 = 1_000.0;
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Wrapper key used by the JSON object trace format
pub const TRACE_EVENTS_FIELD: &str = "traceEvents";

// Process discovery
pub const TRACING_STARTED_NAMES: &[&str] = &["TracingStartedInPage"];
pub const PROCESS_NAME_METADATA: &str = "process_name";
pub const RENDERER_PROCESS_NAME: &str = "Renderer";

// Categories whose begin/end pairs are treated as named time ranges
// (console.time / console.timeEnd and performance.measure)
pub const MARKER_CATEGORIES: &[&str] = &["blink.console", "blink.user_timing"];

// Page load
pub const NAVIGATION_START_NAMES: &[&str] = &["navigationStart"];
pub const LOAD_END_NAMES: &[&str] = &["loadEventEnd", "MarkLoad"];
pub const LOAD_RANGE_TITLE: &str = "Load";

// Input handling
pub const INPUT_DISPATCH_NAME: &str = "EventDispatch";
pub const INPUT_LATENCY_PREFIX: &str = "InputLatency::";
pub const INPUT_EVENT_TYPES: &[&str] = &[
    "click",
    "dblclick",
    "mousedown",
    "mouseup",
    "keydown",
    "keypress",
    "keyup",
    "touchstart",
    "touchend",
    "pointerdown",
    "pointerup",
    "wheel",
];

// Frame presentation, in priority order. Only the first name present in the
// renderer process is counted so a single frame is never counted twice.
pub const FRAME_SWAP_NAMES: &[&str] = &["DrawFrame", "SwapBuffers", "BeginFrame"];

// Animation inference
pub const ANIMATION_MAX_FRAME_GAP_MICROS: f64 = 50_000.0;
pub const ANIMATION_MIN_FRAMES: usize = 10;

// Script execution
pub const SCRIPT_EVENT_NAMES: &[&str] = &["FunctionCall", "EvaluateScript", "v8.evaluateModule"];
pub const SCRIPT_URL_PATHS: &[&[&str]] = &[
    &["data", "url"],
    &["data", "scriptName"],
    &["data", "fileName"],
];

// Rendering work that script can force synchronously
pub const LAYOUT_EVENT_NAMES: &[&str] = &["Layout"];
pub const RECALC_STYLE_EVENT_NAMES: &[&str] =
    &["UpdateLayoutTree", "RecalculateStyle", "RecalculateStyles"];

// Extension detection
pub const EXTENSION_URL_SCHEMES: &[&str] =
    &["chrome-extension://", "moz-extension://", "extension://"];
pub const EXTENSION_EVENT_PREFIX: &str = "extensions::";
pub const EXTENSION_URL_PATHS: &[&[&str]] = &[
    &["data", "url"],
    &["data", "scriptName"],
    &["data", "sourceURL"],
    &["url"],
    &["fileName"],
];
pub const EXTENSIONS_REMEDIATION: &str = "Extensions running during capture; disable all \
     extensions (or use a clean browser profile) and record the trace again";
