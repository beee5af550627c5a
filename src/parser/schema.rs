//! Output schema definitions for analysis results.
//!
//! This module defines the structure of the JSON we hand back to callers
//! and write to disk. Field names are camelCase to match what trace tooling
//! expects; the report envelope is versioned to allow future evolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// RAIL label for a time range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RailType {
    Response,
    Animation,
    Idle,
    Load,
}

impl RailType {
    pub const ALL: [RailType; 4] = [
        RailType::Response,
        RailType::Animation,
        RailType::Idle,
        RailType::Load,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RailType::Response => "Response",
            RailType::Animation => "Animation",
            RailType::Idle => "Idle",
            RailType::Load => "Load",
        }
    }
}

impl fmt::Display for RailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RailType {
    type Err = String;

    /// Case-insensitive, so `animation` and `ANIMATION` both work on the CLI
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RailType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown RAIL type '{}' (expected Response, Animation, Idle or Load)",
                    s
                )
            })
    }
}

/// Derived metrics attached to each range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedInfo {
    /// Script CPU time in milliseconds, keyed by origin (URL host)
    pub java_script: BTreeMap<String, f64>,

    /// Style recalculations forced synchronously by script
    pub forced_recalcs: u32,

    /// Layouts forced synchronously by script
    pub forced_layouts: u32,
}

/// One analysed time range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub title: String,

    /// Absolute trace timestamps in microseconds
    pub start_micros: f64,
    pub end_micros: f64,

    /// Milliseconds relative to the first event of the trace
    pub start: f64,
    pub end: f64,

    #[serde(rename = "type")]
    pub rail_type: RailType,

    /// `None` when no frames were presented or the range has no duration
    pub fps: Option<f64>,

    pub extended_info: ExtendedInfo,
}

impl TimeRange {
    /// Window length in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.end - self.start
    }
}

/// Result of one analysis call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Ranges in ascending start order
    pub ranges: Vec<TimeRange>,

    /// Non-fatal notes, e.g. extensions seen in non-strict mode
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,
}

/// Report envelope written to disk by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace file the report was computed from
    pub source: String,

    pub ranges: Vec<TimeRange>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

impl Report {
    /// Wrap an analysis in a versioned, timestamped envelope
    pub fn from_analysis(analysis: Analysis, source: impl Into<String>) -> Self {
        use chrono::Utc;

        Self {
            version: crate::utils::config::SCHEMA_VERSION.to_string(),
            source: source.into(),
            ranges: analysis.ranges,
            advisories: analysis.advisories,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}
