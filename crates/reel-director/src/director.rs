//! Creative director facade.

use reel_models::FrameAnalysis;
use tracing::info;

use crate::composition::CompositionPlanner;
use crate::config::DirectorConfig;
use crate::decisions::DirectorDecisions;
use crate::error::DirectorResult;
use crate::highlight::{HighlightDetector, MULTI_KILL_WINDOW_SECS};
use crate::scoring::ClipScorer;

/// Coordinates highlight detection, composition planning, and scoring.
pub struct CreativeDirector {
    detector: HighlightDetector,
    planner: CompositionPlanner,
    scorer: ClipScorer,
}

impl CreativeDirector {
    pub fn new(config: DirectorConfig) -> Self {
        Self {
            detector: HighlightDetector::new(),
            planner: CompositionPlanner::new(config),
            scorer: ClipScorer::new(),
        }
    }

    /// Run the full creative direction pipeline.
    ///
    /// Sentinel-failed analyses are excluded before any scoring. Pure:
    /// the same analyses always yield the same decisions.
    pub fn direct(&self, analyses: &[FrameAnalysis]) -> DirectorResult<DirectorDecisions> {
        let usable: Vec<FrameAnalysis> = analyses
            .iter()
            .filter(|a| !a.is_failed())
            .cloned()
            .collect();
        info!(
            "Creative direction starting with {} analyses ({} excluded)",
            usable.len(),
            analyses.len() - usable.len()
        );

        // Highlight director: excitement + event detection
        let enhanced = self.detector.score_excitement(usable);
        let multi_events = self
            .detector
            .detect_multi_events(&enhanced, MULTI_KILL_WINDOW_SECS);
        let clutch_moments = self.detector.detect_clutch_moments(&enhanced);
        let momentum_shifts = self.detector.detect_momentum_shifts(&enhanced);
        info!(
            "Detected: {} multi-events, {} clutch moments, {} momentum shifts",
            multi_events.len(),
            clutch_moments.len(),
            momentum_shifts.len()
        );

        let highlights = self
            .detector
            .suggest_highlights(&enhanced, &multi_events, &clutch_moments)?;

        // Composition director: optimize and order
        let clips = self.planner.optimize(highlights, &enhanced)?;
        let hook_clip = self.planner.create_hook_intro(&clips)?;

        // Scoring director: engagement analysis
        let engagement_curve = self.planner.analyze_engagement_curve(&clips);
        let variety_analysis = self.detector.analyze_variety(&clips);
        let engagement = self.scorer.predict_engagement(&clips, &enhanced);
        let suggestions = self.scorer.suggest_improvements(&clips);

        info!(
            "Creative direction complete: {} clips, total {:.1}s",
            clips.len(),
            clips.iter().map(reel_models::Clip::duration).sum::<f64>()
        );

        Ok(DirectorDecisions {
            clips,
            hook_clip,
            engagement_curve,
            variety_analysis,
            engagement,
            suggestions,
            multi_events,
            clutch_moments,
            momentum_shifts,
        })
    }
}
