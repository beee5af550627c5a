//! Trace fixtures shared by the integration tests.
//!
//! pid 1 is the browser process, pid 2 the renderer.

#![allow(dead_code)]

use serde_json::{json, Value};

pub const BROWSER: u64 = 1;
pub const RENDERER: u64 = 2;
pub const FRAME_INTERVAL: u64 = 16_667;

fn metadata() -> Vec<Value> {
    vec![
        json!({"pid": BROWSER, "tid": 1, "ph": "M", "name": "process_name", "ts": 0,
               "args": {"name": "Browser"}}),
        json!({"pid": RENDERER, "tid": 1, "ph": "M", "name": "process_name", "ts": 0,
               "args": {"name": "Renderer"}}),
        json!({"pid": RENDERER, "tid": 1, "ph": "M", "name": "thread_name", "ts": 0,
               "args": {"name": "CrRendererMain"}}),
    ]
}

pub fn frames(pid: u64, start: u64, count: u64) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({"pid": pid, "tid": 3, "ph": "X", "cat": "cc", "name": "DrawFrame",
                   "ts": start + i * FRAME_INTERVAL, "dur": 200})
        })
        .collect()
}

pub fn console_marker(name: &str, id: u64, start: u64, end: u64) -> Vec<Value> {
    vec![
        json!({"pid": RENDERER, "tid": 1, "ph": "b", "cat": "blink.console", "name": name,
               "id": id, "ts": start}),
        json!({"pid": RENDERER, "tid": 1, "ph": "e", "cat": "blink.console", "name": name,
               "id": id, "ts": end}),
    ]
}

pub fn user_timing_measure(name: &str, id: u64, start: u64, end: u64) -> Vec<Value> {
    vec![
        json!({"pid": RENDERER, "tid": 1, "ph": "b", "cat": "blink.user_timing", "name": name,
               "id": id, "ts": start}),
        json!({"pid": RENDERER, "tid": 1, "ph": "e", "cat": "blink.user_timing", "name": name,
               "id": id, "ts": end}),
    ]
}

pub fn script(name: &str, url: Option<&str>, ts: u64, dur: u64) -> Value {
    let args = match url {
        Some(url) => json!({"data": {"url": url}}),
        None => json!({}),
    };
    json!({"pid": RENDERER, "tid": 1, "ph": "X", "cat": "devtools.timeline", "name": name,
           "ts": ts, "dur": dur, "args": args})
}

pub fn work(name: &str, ts: u64, dur: u64) -> Value {
    json!({"pid": RENDERER, "tid": 1, "ph": "X", "cat": "devtools.timeline", "name": name,
           "ts": ts, "dur": dur})
}

pub fn click(ts: u64) -> Value {
    json!({"pid": RENDERER, "tid": 1, "ph": "X", "cat": "devtools.timeline",
           "name": "EventDispatch", "ts": ts, "dur": 2_000, "args": {"data": {"type": "click"}}})
}

fn trace(events: Vec<Value>) -> Value {
    let mut all = metadata();
    all.extend(events);
    json!({ "traceEvents": all })
}

/// Page load: navigation start to load end with scripts from two origins
pub fn load_trace() -> Value {
    trace(vec![
        json!({"pid": RENDERER, "tid": 1, "ph": "R", "cat": "blink.user_timing",
               "name": "navigationStart", "ts": 1_000}),
        script("EvaluateScript", Some("http://localhost:11080/app.js"), 50_000, 200_000),
        script("FunctionCall", Some("http://localhost:11080/app.js"), 300_000, 45_500),
        script("EvaluateScript", Some("https://www.google-analytics.com/analytics.js"), 400_000, 59_500),
        script("FunctionCall", None, 500_000, 10_000),
        json!({"pid": RENDERER, "tid": 1, "ph": "R", "cat": "blink.user_timing",
               "name": "loadEventEnd", "ts": 900_000}),
    ])
}

/// console.time("sideNavAnimation") around ~1.18s of 60fps frames
pub fn animation_trace() -> Value {
    let start = 1_000_000;
    let mut events = console_marker("sideNavAnimation", 1, start, start + 1_179_500);
    events.extend(frames(RENDERER, start, 71));
    // Browser UI frames overlapping the range must not count
    events.extend(frames(BROWSER, start + 5_000, 71));
    trace(events)
}

/// console.time range with a neutral title around 60fps frames
pub fn untitled_animation_trace() -> Value {
    let start = 1_000_000;
    let mut events = console_marker("sideNav", 1, start, start + 1_179_500);
    events.extend(frames(RENDERER, start, 71));
    trace(events)
}

/// A click answered by a frame, then an unrelated animation
pub fn response_animation_trace() -> Value {
    let mut events = vec![click(100_000)];
    events.extend(frames(RENDERER, 140_000, 1));
    events.extend(frames(RENDERER, 400_000, 30));
    trace(events)
}

/// One script-forced layout and style recalc, plus scheduled ones
pub fn forced_layout_trace() -> Value {
    let mut events = console_marker("layoutThrash", 1, 10_000, 60_000);
    events.extend([
        script("FunctionCall", Some("https://example.com/app.js"), 20_000, 10_000),
        work("Layout", 22_000, 1_000),
        work("UpdateLayoutTree", 25_000, 1_000),
        work("BeginMainThreadFrame", 40_000, 5_000),
        work("UpdateLayoutTree", 41_000, 500),
        work("Layout", 42_000, 500),
        work("Layout", 50_000, 500),
    ]);
    trace(events)
}

/// Load trace with an extension content script
pub fn extension_trace() -> Value {
    let mut value = load_trace();
    if let Some(events) = value["traceEvents"].as_array_mut() {
        events.push(script(
            "EvaluateScript",
            Some("chrome-extension://abcdefghijklmnop/content.js"),
            600_000,
            5_000,
        ));
    }
    value
}

/// Page load with an analytics measure inside it, then a click answered by
/// a frame, then an animation
pub fn mixed_trace() -> Value {
    let mut value = load_trace();
    if let Some(events) = value["traceEvents"].as_array_mut() {
        events.extend(user_timing_measure("analytics-init", 7, 600_000, 601_000));
        events.push(click(1_000_000));
        events.extend(frames(RENDERER, 1_040_000, 1));
        events.extend(frames(RENDERER, 1_300_000, 30));
    }
    value
}
