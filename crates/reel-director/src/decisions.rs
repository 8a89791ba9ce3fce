//! Director output types.

use serde::Serialize;

use reel_models::{Clip, ClutchMoment, MomentumShift, MultiEvent};

/// Shape of the engagement curve over the final clip sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EngagementCurve {
    pub avg_score: f64,
    pub score_variance: f64,
    /// Index of the highest-scored clip in the final order.
    pub peak_index: usize,
    pub total_duration: f64,
    pub clip_count: usize,
    /// 0-100, distance of the average clip length from the optimal pace.
    pub pacing_score: f64,
}

/// Issues flagged by the variety analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarietyIssue {
    NoClips,
    LowTypeVariety,
    UniformClipLengths,
}

impl VarietyIssue {
    /// Human-readable warning text.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoClips => "No clips were selected.",
            Self::LowTypeVariety => "Clips lean on a single highlight type.",
            Self::UniformClipLengths => "Clip lengths are nearly uniform.",
        }
    }
}

/// Variety of clip types and durations in the final sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VarietyAnalysis {
    /// 0-100
    pub variety_score: f64,
    pub unique_types: usize,
    pub duration_variance: f64,
    pub issues: Vec<VarietyIssue>,
}

/// Predicted audience engagement for the assembled reel.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EngagementSummary {
    /// 0-100 composite score
    pub overall_score: u8,
    /// 0-100 predicted retention
    pub retention_prediction: u8,
    /// 0-15 predicted click-through rate, percent
    pub click_through_rate: u8,
    pub watch_time_minutes: f64,
}

/// Everything the creative direction pass produces.
#[derive(Debug, Clone)]
pub struct DirectorDecisions {
    /// Final clips in playback (pacing) order.
    pub clips: Vec<Clip>,
    /// Optional 3-second intro cut from the best clip.
    pub hook_clip: Option<Clip>,
    pub engagement_curve: EngagementCurve,
    pub variety_analysis: VarietyAnalysis,
    pub engagement: EngagementSummary,
    pub suggestions: Vec<String>,
    pub multi_events: Vec<MultiEvent>,
    pub clutch_moments: Vec<ClutchMoment>,
    pub momentum_shifts: Vec<MomentumShift>,
}
