//! Frame analysis models.
//!
//! `RawFrameAnalysis` mirrors the JSON the vision models emit (snake_case
//! keys, everything optional); `FrameAnalysis` is the canonical form the rest
//! of the pipeline consumes. Unknown enum strings coerce to the conservative
//! fallback variant instead of failing the whole parse.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Match state observed in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Normal,
    Clutch,
    Victory,
    Defeat,
    Overtime,
    #[serde(other)]
    Unknown,
}

impl Default for MatchStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

/// On-screen action level observed in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionIntensity {
    VeryHigh,
    High,
    Medium,
    #[serde(other)]
    Low,
}

impl Default for ActionIntensity {
    fn default() -> Self {
        Self::Low
    }
}

/// Visual fidelity of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualQuality {
    Cinematic,
    High,
    Low,
    #[serde(other)]
    Normal,
}

impl Default for VisualQuality {
    fn default() -> Self {
        Self::Normal
    }
}

/// Metadata key carrying the failure message of a sentinel analysis.
pub const ERROR_KEY: &str = "error";

/// AI vision analysis of a single sampled frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Position of the frame in the source video, seconds.
    pub timestamp: f64,

    /// Whether a kill feed entry is visible.
    pub kill_log: bool,

    /// Number of kills visible in the feed.
    pub kill_count: u32,

    pub match_status: MatchStatus,

    pub action_intensity: ActionIntensity,

    /// Whether an enemy is on screen.
    pub enemy_visible: bool,

    pub enemy_count: u32,

    pub visual_quality: VisualQuality,

    pub scene_description: String,

    /// Visible HUD/UI elements, free text.
    pub ui_elements: String,

    /// Model self-reported confidence in `[0, 1]`.
    pub confidence: f64,

    /// Derived downstream by the director; zero until scored.
    pub excitement_score: f64,

    /// Which upstream model produced this analysis.
    pub model_used: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl FrameAnalysis {
    /// Conservative analysis for a frame whose response could not be parsed.
    ///
    /// Not marked as errored: an unparseable body is still a successful
    /// round-trip, unlike a transport failure.
    pub fn degraded(timestamp: f64, model: impl Into<String>) -> Self {
        Self {
            timestamp,
            kill_log: false,
            kill_count: 0,
            match_status: MatchStatus::Unknown,
            action_intensity: ActionIntensity::Low,
            enemy_visible: false,
            enemy_count: 0,
            visual_quality: VisualQuality::Normal,
            scene_description: String::new(),
            ui_elements: String::new(),
            confidence: 0.0,
            excitement_score: 0.0,
            model_used: model.into(),
            metadata: Map::new(),
        }
    }

    /// Sentinel analysis recording a per-frame transport failure.
    pub fn failed(timestamp: f64, error: impl Into<String>) -> Self {
        let mut analysis = Self::degraded(timestamp, "");
        analysis
            .metadata
            .insert(ERROR_KEY.to_string(), Value::String(error.into()));
        analysis
    }

    /// Whether this is a sentinel for a failed frame (excluded from scoring).
    pub fn is_failed(&self) -> bool {
        self.metadata.contains_key(ERROR_KEY)
    }

    /// The failure message of a sentinel analysis, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.metadata.get(ERROR_KEY).and_then(Value::as_str)
    }
}

/// Vision-model JSON schema with lenient defaults.
#[derive(Debug, Default, Deserialize)]
pub struct RawFrameAnalysis {
    #[serde(default)]
    pub kill_log: bool,
    #[serde(default)]
    pub kill_count: i64,
    #[serde(default)]
    pub match_status: MatchStatus,
    #[serde(default)]
    pub action_intensity: ActionIntensity,
    #[serde(default)]
    pub enemy_visible: bool,
    #[serde(default)]
    pub enemy_count: i64,
    #[serde(default)]
    pub visual_quality: VisualQuality,
    #[serde(default)]
    pub scene_description: String,
    #[serde(default)]
    pub ui_elements: String,
    #[serde(default)]
    pub confidence: f64,
}

impl RawFrameAnalysis {
    /// Coerce into the canonical form, clamping out-of-range numerics.
    pub fn into_analysis(self, timestamp: f64, model: impl Into<String>) -> FrameAnalysis {
        FrameAnalysis {
            timestamp: timestamp.max(0.0),
            kill_log: self.kill_log,
            kill_count: self.kill_count.max(0) as u32,
            match_status: self.match_status,
            action_intensity: self.action_intensity,
            enemy_visible: self.enemy_visible,
            enemy_count: self.enemy_count.max(0) as u32,
            visual_quality: self.visual_quality,
            scene_description: self.scene_description,
            ui_elements: self.ui_elements,
            confidence: self.confidence.clamp(0.0, 1.0),
            excitement_score: 0.0,
            model_used: model.into(),
            metadata: Map::new(),
        }
    }
}
