//! Clip scoring and engagement prediction.

use std::collections::HashSet;

use reel_models::{ActionIntensity, Clip, ClipType, FrameAnalysis};

use crate::decisions::EngagementSummary;
use crate::stats::{mean, sample_stdev};

/// Scores clip sequences and suggests improvements.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipScorer;

impl ClipScorer {
    pub fn new() -> Self {
        Self
    }

    /// Predict overall engagement for the assembled reel.
    pub fn predict_engagement(
        &self,
        clips: &[Clip],
        analyses: &[FrameAnalysis],
    ) -> EngagementSummary {
        if clips.is_empty() {
            return EngagementSummary::default();
        }

        let excitement: Vec<f64> = analyses
            .iter()
            .map(|a| a.excitement_score)
            .filter(|score| *score > 0.0)
            .collect();
        let avg_excitement = mean(&excitement);

        let durations: Vec<f64> = clips.iter().map(Clip::duration).collect();
        let length_spread = sample_stdev(&durations);

        let types: HashSet<ClipType> = clips.iter().map(|c| c.clip_type).collect();
        let diversity_bonus = (types.len() as f64 * 5.0).min(15.0);

        let overall =
            (avg_excitement * 1.5 + length_spread * 5.0 + diversity_bonus).round();
        // Retention and CTR truncate, they do not round
        let retention = if avg_excitement > 0.0 {
            ((avg_excitement / 50.0) * 100.0).trunc().min(100.0)
        } else {
            0.0
        };
        let ctr = (avg_excitement / 5.0).trunc().min(15.0);

        EngagementSummary {
            overall_score: overall.clamp(0.0, 100.0) as u8,
            retention_prediction: retention.max(0.0) as u8,
            click_through_rate: ctr.max(0.0) as u8,
            watch_time_minutes: durations.iter().sum::<f64>() / 60.0,
        }
    }

    /// Timestamps where viewers are likely to drop off.
    ///
    /// Clips with high action tolerate more length before losing viewers.
    pub fn detect_drop_off_points(&self, clips: &[Clip]) -> Vec<f64> {
        clips
            .iter()
            .filter(|clip| {
                let threshold = match clip.action_intensity {
                    ActionIntensity::VeryHigh | ActionIntensity::High => 20.0,
                    ActionIntensity::Medium => 12.0,
                    ActionIntensity::Low => 15.0,
                };
                clip.duration() > threshold
            })
            .map(|clip| clip.start())
            .collect()
    }

    /// Threshold-driven advice for better engagement.
    pub fn suggest_improvements(&self, clips: &[Clip]) -> Vec<String> {
        let mut suggestions = Vec::new();
        let total_duration: f64 = clips.iter().map(Clip::duration).sum();

        if total_duration > 300.0 {
            suggestions.push("Video is too long. Consider trimming to 3-5 minutes.".to_string());
        }
        if clips.len() > 15 {
            suggestions.push("Too many clips. Focus on the best highlights only.".to_string());
        }
        if total_duration < 30.0 {
            suggestions.push("Video is very short. Consider including more clips.".to_string());
        }

        let low_scoring = clips.iter().filter(|c| c.score.value() < 30.0).count();
        if low_scoring as f64 > clips.len() as f64 * 0.3 {
            suggestions.push(
                "Many low-scoring clips detected. Consider raising the quality threshold."
                    .to_string(),
            );
        }

        let types: HashSet<ClipType> = clips.iter().map(|c| c.clip_type).collect();
        if types.len() < 2 && clips.len() > 3 {
            suggestions.push(
                "Low clip variety. Mix different highlight types for better pacing.".to_string(),
            );
        }

        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_models::{QualityScore, TimeRange};

    fn clip(start: f64, end: f64, score: f64, clip_type: ClipType) -> Clip {
        Clip::new(
            TimeRange::new(start, end).unwrap(),
            clip_type,
            "LABEL",
            "reason",
            7,
            QualityScore::new(score),
        )
    }

    fn excited_frame(score: f64) -> FrameAnalysis {
        let mut a = FrameAnalysis::degraded(0.0, "m1");
        a.excitement_score = score;
        a
    }

    #[test]
    fn test_predict_engagement_empty() {
        let scorer = ClipScorer::new();
        assert_eq!(scorer.predict_engagement(&[], &[]), EngagementSummary::default());
    }

    #[test]
    fn test_predict_engagement_composite() {
        let scorer = ClipScorer::new();
        // Two clip types, uniform 5s durations (stdev 0), avg excitement 40
        let clips = vec![
            clip(0.0, 5.0, 80.0, ClipType::MultiKill),
            clip(10.0, 15.0, 70.0, ClipType::Clutch),
        ];
        let analyses = vec![excited_frame(40.0), excited_frame(40.0), excited_frame(0.0)];

        let summary = scorer.predict_engagement(&clips, &analyses);
        // 40 * 1.5 + 0 + 10
        assert_eq!(summary.overall_score, 70);
        // (40 / 50) * 100
        assert_eq!(summary.retention_prediction, 80);
        assert_eq!(summary.click_through_rate, 8);
        assert!((summary.watch_time_minutes - 10.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_engagement_truncates_fractions() {
        let scorer = ClipScorer::new();
        let clips = vec![clip(0.0, 5.0, 80.0, ClipType::MultiKill)];
        let analyses = vec![excited_frame(43.6)];

        let summary = scorer.predict_engagement(&clips, &analyses);
        // (43.6 / 50) * 100 = 87.2 and 43.6 / 5 = 8.72 truncate, never round up
        assert_eq!(summary.retention_prediction, 87);
        assert_eq!(summary.click_through_rate, 8);
        // overall_score keeps its rounding: 43.6 * 1.5 + 0 + 5 = 70.4
        assert_eq!(summary.overall_score, 70);
    }

    #[test]
    fn test_predict_engagement_caps() {
        let scorer = ClipScorer::new();
        let clips = vec![
            clip(0.0, 3.0, 80.0, ClipType::MultiKill),
            clip(10.0, 24.0, 70.0, ClipType::Clutch),
            clip(30.0, 36.0, 60.0, ClipType::HighExcitement),
            clip(40.0, 50.0, 50.0, ClipType::Hook),
        ];
        let analyses = vec![excited_frame(90.0), excited_frame(85.0)];

        let summary = scorer.predict_engagement(&clips, &analyses);
        assert_eq!(summary.overall_score, 100);
        assert_eq!(summary.retention_prediction, 100);
        assert_eq!(summary.click_through_rate, 15);
    }

    #[test]
    fn test_drop_off_thresholds_by_intensity() {
        let scorer = ClipScorer::new();

        let mut patient = clip(0.0, 18.0, 80.0, ClipType::MultiKill);
        patient.action_intensity = ActionIntensity::High;
        let mut boring = clip(30.0, 43.0, 40.0, ClipType::Generic);
        boring.action_intensity = ActionIntensity::Medium;

        // 18s high-action clip is under its 20s threshold; 13s medium clip
        // exceeds its 12s threshold
        let drop_offs = scorer.detect_drop_off_points(&[patient, boring]);
        assert_eq!(drop_offs, vec![30.0]);
    }

    #[test]
    fn test_suggestions_thresholds() {
        let scorer = ClipScorer::new();

        // Over 300s total, one type, more than 3 clips, all low-scoring
        let clips: Vec<Clip> = (0..5)
            .map(|i| {
                clip(
                    i as f64 * 100.0,
                    i as f64 * 100.0 + 70.0,
                    10.0,
                    ClipType::Generic,
                )
            })
            .collect();
        let suggestions = scorer.suggest_improvements(&clips);

        assert!(suggestions.iter().any(|s| s.contains("too long")));
        assert!(suggestions.iter().any(|s| s.contains("low-scoring")));
        assert!(suggestions.iter().any(|s| s.contains("variety")));
    }

    #[test]
    fn test_suggestions_short_video() {
        let scorer = ClipScorer::new();
        let clips = vec![clip(0.0, 10.0, 80.0, ClipType::MultiKill)];
        let suggestions = scorer.suggest_improvements(&clips);
        assert!(suggestions.iter().any(|s| s.contains("very short")));
    }

    #[test]
    fn test_no_suggestions_for_balanced_reel() {
        let scorer = ClipScorer::new();
        let clips = vec![
            clip(0.0, 15.0, 80.0, ClipType::MultiKill),
            clip(30.0, 45.0, 75.0, ClipType::Clutch),
            clip(60.0, 72.0, 70.0, ClipType::HighExcitement),
        ];
        assert!(scorer.suggest_improvements(&clips).is_empty());
    }
}
