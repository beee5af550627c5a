//! Typed representation of a single Chrome trace event.
//!
//! Only the fields the analyzer reads are typed. Everything event specific
//! stays in `args`, which is read through accessors that treat a missing key
//! as "not present" rather than as an error: event schemas drift between
//! browser versions.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Event phase (`ph` field)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// `B` - opens a duration span on a thread
    Begin,
    /// `E` - closes the innermost open `B` on a thread
    End,
    /// `X` - span with an explicit `dur`
    Complete,
    /// `i` / `I`
    Instant,
    /// `C`
    Counter,
    /// `b` / `S` - opens an async span, paired by `id`
    AsyncBegin,
    /// `e` / `F`
    AsyncEnd,
    /// `n` / `T` / `p`
    AsyncStep,
    /// `R` - navigation timing mark
    Mark,
    /// `M`
    Metadata,
    Other(String),
}

impl Phase {
    /// Map a raw `ph` code onto a phase. Unknown codes are kept, never rejected.
    pub fn from_code(code: &str) -> Self {
        match code {
            "B" => Phase::Begin,
            "E" => Phase::End,
            "X" => Phase::Complete,
            "i" | "I" => Phase::Instant,
            "C" => Phase::Counter,
            "b" | "S" => Phase::AsyncBegin,
            "e" | "F" => Phase::AsyncEnd,
            "n" | "T" | "p" => Phase::AsyncStep,
            "R" => Phase::Mark,
            "M" => Phase::Metadata,
            other => Phase::Other(other.to_string()),
        }
    }

    /// True for phases that open a span (`B`, `b`, `S`)
    pub fn is_begin(&self) -> bool {
        matches!(self, Phase::Begin | Phase::AsyncBegin)
    }

    /// True for phases that close a span (`E`, `e`, `F`)
    pub fn is_end(&self) -> bool {
        matches!(self, Phase::End | Phase::AsyncEnd)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Other(String::new())
    }
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Phase::from_code(&code))
    }
}

/// One trace record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraceEvent {
    #[serde(default)]
    pub pid: Option<u64>,

    #[serde(default, deserialize_with = "deserialize_tid")]
    pub tid: u64,

    #[serde(default, rename = "ph")]
    pub phase: Phase,

    #[serde(default)]
    pub name: String,

    /// Comma separated category list, e.g. `"devtools.timeline,rail"`
    #[serde(default, rename = "cat")]
    pub category: String,

    /// Timestamp in microseconds
    #[serde(default)]
    pub ts: f64,

    /// Duration in microseconds, only for `X` events
    #[serde(default)]
    pub dur: Option<f64>,

    /// Async pairing id. Browsers emit both numbers and hex strings.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,

    #[serde(default)]
    pub args: Value,
}

impl TraceEvent {
    /// Look up a nested argument, e.g. `event.arg(&["data", "url"])`
    ///
    /// Returns `None` as soon as any key along the path is absent or the
    /// intermediate value is not an object.
    pub fn arg(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.args, |value, key| value.get(*key))
    }

    /// String flavour of [`TraceEvent::arg`]
    pub fn arg_str(&self, path: &[&str]) -> Option<&str> {
        self.arg(path).and_then(Value::as_str)
    }

    /// Whether `category` appears in the event's comma separated category list
    pub fn has_category(&self, category: &str) -> bool {
        self.category.split(',').any(|c| c.trim() == category)
    }

    /// Explicit duration of a complete event
    pub fn duration_micros(&self) -> Option<f64> {
        match self.phase {
            Phase::Complete => self.dur.filter(|d| d.is_finite() && *d >= 0.0),
            _ => None,
        }
    }

    /// End timestamp for complete events, the start timestamp otherwise
    pub fn end_micros(&self) -> f64 {
        self.ts + self.duration_micros().unwrap_or(0.0)
    }

    pub fn is_metadata(&self) -> bool {
        self.phase == Phase::Metadata
    }

    /// Whether `ts` lies inside the closed window `[start, end]`
    pub fn within(&self, start: f64, end: f64) -> bool {
        self.ts >= start && self.ts <= end
    }
}

fn deserialize_tid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    })
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
