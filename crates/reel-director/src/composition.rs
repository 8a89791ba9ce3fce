//! Composition planning and pacing optimization.

use reel_models::{
    ActionIntensity, Clip, ClipType, FrameAnalysis, MatchStatus, QualityScore, TimeRange,
};

use crate::config::DirectorConfig;
use crate::decisions::EngagementCurve;
use crate::error::DirectorResult;
use crate::stats::{mean, sample_variance};

/// Hook intros are cut to this length, centred on the best clip.
const HOOK_LENGTH_SECS: f64 = 3.0;

/// At most this many low-intensity clips survive pacing.
const MAX_LOW_INTENSITY_CLIPS: usize = 2;

/// Plans and optimizes clip composition for maximum engagement.
#[derive(Debug, Clone)]
pub struct CompositionPlanner {
    config: DirectorConfig,
}

impl CompositionPlanner {
    pub fn new(config: DirectorConfig) -> Self {
        Self { config }
    }

    /// Full optimization pipeline: score, bound lengths, trim to target,
    /// reorder for pacing.
    pub fn optimize(
        &self,
        clips: Vec<Clip>,
        analyses: &[FrameAnalysis],
    ) -> DirectorResult<Vec<Clip>> {
        let scored = self.score_clips(clips, analyses);
        let mut adjusted = self.adjust_clip_lengths(scored)?;
        adjusted.sort_by(|a, b| b.score.value().total_cmp(&a.score.value()));
        let trimmed = self.trim_to_target(adjusted)?;
        Ok(self.optimize_pacing(trimmed))
    }

    /// Re-score each clip against the analysis closest to its midpoint and
    /// inherit that frame's intensity.
    pub fn score_clips(&self, clips: Vec<Clip>, analyses: &[FrameAnalysis]) -> Vec<Clip> {
        clips
            .into_iter()
            .map(|clip| {
                let midpoint = clip.time_range.midpoint();
                let closest = analyses
                    .iter()
                    .min_by(|a, b| {
                        (a.timestamp - midpoint)
                            .abs()
                            .total_cmp(&(b.timestamp - midpoint).abs())
                    });

                let mut score: f64 = 0.0;
                let mut intensity = clip.action_intensity;
                if let Some(frame) = closest {
                    if frame.kill_log {
                        score += 10.0;
                    }
                    score += match frame.action_intensity {
                        ActionIntensity::VeryHigh => 8.0,
                        ActionIntensity::High => 6.0,
                        ActionIntensity::Medium => 4.0,
                        ActionIntensity::Low => 2.0,
                    };
                    match frame.match_status {
                        MatchStatus::Victory => score += 5.0,
                        MatchStatus::Clutch => score += 7.0,
                        _ => {}
                    }
                    intensity = frame.action_intensity;
                }

                let duration = clip.duration();
                if duration > self.config.max_clip_length {
                    score -= 2.0;
                } else if duration < self.config.min_clip_length {
                    score -= 1.0;
                }

                let mut scored = clip.with_score(QualityScore::new(score.max(0.0)));
                scored.action_intensity = intensity;
                scored
            })
            .collect()
    }

    /// Bound each clip's duration: centred truncation above the maximum,
    /// symmetric extension below the minimum.
    pub fn adjust_clip_lengths(&self, clips: Vec<Clip>) -> DirectorResult<Vec<Clip>> {
        let mut adjusted = Vec::with_capacity(clips.len());
        for clip in clips {
            let duration = clip.duration();
            if duration > self.config.max_clip_length {
                let center = clip.time_range.midpoint();
                let half = self.config.max_clip_length / 2.0;
                let range = TimeRange::new(
                    clip.start().max(center - half),
                    clip.end().min(center + half),
                )?;
                adjusted.push(clip.with_range(range));
            } else if duration < self.config.min_clip_length {
                let extension = (self.config.min_clip_length - duration) / 2.0;
                let range = clip.time_range.extend(extension, extension)?;
                adjusted.push(clip.with_range(range));
            } else {
                adjusted.push(clip);
            }
        }
        Ok(adjusted)
    }

    /// Greedily admit score-ordered clips until the target duration is
    /// reached; the overflowing clip is head-sliced when the remainder is
    /// still a viable clip, otherwise dropped.
    pub fn trim_to_target(&self, clips: Vec<Clip>) -> DirectorResult<Vec<Clip>> {
        let total: f64 = clips.iter().map(Clip::duration).sum();
        if total <= self.config.target_duration {
            return Ok(clips);
        }

        let mut trimmed = Vec::new();
        let mut accumulated = 0.0;
        for clip in clips {
            let duration = clip.duration();
            if accumulated + duration <= self.config.target_duration {
                accumulated += duration;
                trimmed.push(clip);
            } else {
                let remaining = self.config.target_duration - accumulated;
                if remaining >= self.config.min_clip_length {
                    let range = TimeRange::new(clip.start(), clip.start() + remaining)?;
                    trimmed.push(clip.with_range(range));
                }
                break;
            }
        }
        Ok(trimmed)
    }

    /// Interleave high and medium intensity clips for an engaging rhythm,
    /// then close with at most two low-intensity clips.
    pub fn optimize_pacing(&self, clips: Vec<Clip>) -> Vec<Clip> {
        if clips.len() <= 2 {
            return clips;
        }

        let mut high = Vec::new();
        let mut medium = Vec::new();
        let mut low = Vec::new();
        for clip in clips {
            match clip.action_intensity {
                ActionIntensity::VeryHigh | ActionIntensity::High => high.push(clip),
                ActionIntensity::Medium => medium.push(clip),
                ActionIntensity::Low => low.push(clip),
            }
        }

        let mut ordered = Vec::new();
        let mut high = high.into_iter();
        let mut medium = medium.into_iter();

        if let Some(first) = high.next() {
            ordered.push(first);
        }
        loop {
            let next_medium = medium.next();
            let next_high = high.next();
            if next_medium.is_none() && next_high.is_none() {
                break;
            }
            ordered.extend(next_medium);
            ordered.extend(next_high);
        }

        ordered.extend(low.into_iter().take(MAX_LOW_INTENSITY_CLIPS));
        ordered
    }

    /// A 3-second hook cut from the centre of the best clip.
    pub fn create_hook_intro(&self, clips: &[Clip]) -> DirectorResult<Option<Clip>> {
        let Some(first) = clips.first() else {
            return Ok(None);
        };
        let mut best = first;
        for clip in &clips[1..] {
            if clip.score.value() > best.score.value() {
                best = clip;
            }
        }

        let mid = best.time_range.midpoint();
        let half = HOOK_LENGTH_SECS / 2.0;
        let range = TimeRange::new(mid - half, mid + half)?;
        let hook = Clip::new(
            range,
            ClipType::Hook,
            "HOOK",
            "hook",
            0,
            best.score.clone(),
        )
        .into_hook();
        Ok(Some(hook))
    }

    /// Shape of the engagement curve over the final sequence.
    pub fn analyze_engagement_curve(&self, clips: &[Clip]) -> EngagementCurve {
        if clips.is_empty() {
            return EngagementCurve::default();
        }

        let scores: Vec<f64> = clips.iter().map(|c| c.score.value()).collect();
        let mut peak_index = 0;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[peak_index] {
                peak_index = i;
            }
        }

        EngagementCurve {
            avg_score: mean(&scores),
            score_variance: sample_variance(&scores),
            peak_index,
            total_duration: clips.iter().map(Clip::duration).sum(),
            clip_count: clips.len(),
            pacing_score: self.pacing_score(clips),
        }
    }

    /// 0-100, penalizing distance of the average clip length from optimal.
    fn pacing_score(&self, clips: &[Clip]) -> f64 {
        if clips.is_empty() {
            return 0.0;
        }
        let durations: Vec<f64> = clips.iter().map(Clip::duration).collect();
        let deviation = (mean(&durations) - self.config.optimal_pace()).abs();
        (100.0 - deviation * 10.0).max(0.0)
    }
}
