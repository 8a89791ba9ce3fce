//! Run statistics.

use serde::Serialize;

use reel_director::{DirectorDecisions, EngagementCurve, EngagementSummary, VarietyAnalysis};
use reel_models::Clip;

/// Fewer clips than this draws a warning.
const FEW_HIGHLIGHTS_THRESHOLD: usize = 3;

/// Final statistics emitted on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineStats {
    /// Clips in the assembled reel (hook excluded).
    pub clip_count: usize,
    /// Total reel duration, seconds (hook excluded).
    pub total_duration: f64,
    /// 0-100, equals `engagement.overall_score`.
    pub quality_score: u8,
    /// Output size in bytes.
    pub output_size: usize,
    /// Wall-clock processing time, seconds.
    pub processing_time_secs: f64,
    pub suggestions: Vec<String>,
    pub warnings: Vec<String>,
    pub engagement: EngagementSummary,
    pub engagement_curve: EngagementCurve,
    pub variety: VarietyAnalysis,
}

impl PipelineStats {
    /// Aggregate stats from the director's decisions and the final clips.
    pub fn build(
        decisions: &DirectorDecisions,
        final_clips: &[Clip],
        output_size: usize,
        processing_time_secs: f64,
    ) -> Self {
        let mut warnings = Vec::new();
        if final_clips.len() < FEW_HIGHLIGHTS_THRESHOLD {
            warnings.push("Few highlights detected; the reel may be short.".to_string());
        }
        for issue in &decisions.variety_analysis.issues {
            warnings.push(issue.message().to_string());
        }

        Self {
            clip_count: final_clips.len(),
            total_duration: final_clips.iter().map(Clip::duration).sum(),
            quality_score: decisions.engagement.overall_score,
            output_size,
            processing_time_secs,
            suggestions: decisions.suggestions.clone(),
            warnings,
            engagement: decisions.engagement.clone(),
            engagement_curve: decisions.engagement_curve.clone(),
            variety: decisions.variety_analysis.clone(),
        }
    }
}
