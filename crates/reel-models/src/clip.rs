//! Clip entity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::analysis::ActionIntensity;
use crate::quality_score::QualityScore;
use crate::time_range::TimeRange;

/// Provenance category of a candidate clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipType {
    MultiKill,
    Clutch,
    HighExcitement,
    Hook,
    #[serde(other)]
    Generic,
}

impl Default for ClipType {
    fn default() -> Self {
        Self::Generic
    }
}

/// Metadata key marking the hook intro clip.
pub const HOOK_KEY: &str = "is_hook";

/// A candidate highlight interval with its provenance and score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    pub time_range: TimeRange,

    pub clip_type: ClipType,

    /// Display label, e.g. "ACE".
    pub label: String,

    /// Short provenance note.
    pub reason: String,

    /// 1-10, higher wins on overlap merges.
    pub priority: u8,

    pub score: QualityScore,

    /// Inherited best-effort from the dominant frame.
    pub action_intensity: ActionIntensity,

    /// Stable per-object identifier.
    pub id: Uuid,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Clip {
    pub fn new(
        time_range: TimeRange,
        clip_type: ClipType,
        label: impl Into<String>,
        reason: impl Into<String>,
        priority: u8,
        score: QualityScore,
    ) -> Self {
        Self {
            time_range,
            clip_type,
            label: label.into(),
            reason: reason.into(),
            priority,
            score,
            action_intensity: ActionIntensity::Low,
            id: Uuid::new_v4(),
            metadata: Map::new(),
        }
    }

    pub fn start(&self) -> f64 {
        self.time_range.start()
    }

    pub fn end(&self) -> f64 {
        self.time_range.end()
    }

    pub fn duration(&self) -> f64 {
        self.time_range.duration()
    }

    /// Same clip (same id) over a different interval.
    pub fn with_range(&self, time_range: TimeRange) -> Self {
        Self {
            time_range,
            ..self.clone()
        }
    }

    /// Same clip (same id) with a new score.
    pub fn with_score(&self, score: QualityScore) -> Self {
        Self {
            score,
            ..self.clone()
        }
    }

    /// Tag this clip as the hook intro.
    pub fn into_hook(mut self) -> Self {
        self.metadata.insert(HOOK_KEY.to_string(), Value::Bool(true));
        self
    }

    pub fn is_hook(&self) -> bool {
        self.metadata
            .get(HOOK_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
