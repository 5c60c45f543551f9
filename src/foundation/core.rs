/// Logical frame position on the global timeline.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// The frame `delta` frames later, saturating at the top of the timeline.
    pub fn advanced(self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }

    /// Frames elapsed since `earlier`, clamped to zero when `earlier` is ahead.
    pub fn since(self, earlier: FrameIndex) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Dynamic payload exchanged between a routine and the scheduler.
///
/// Resumption inputs, final routine results, and opaque pass-through yields all
/// travel as `Value`. Structured data goes through the [`Value::Json`] variant.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    /// No value ("nothing").
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// Owned text.
    Text(String),
    /// Arbitrary structured data.
    Json(serde_json::Value),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}
