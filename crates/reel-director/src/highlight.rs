//! Highlight detection and excitement analysis.

use std::collections::HashSet;

use reel_models::{
    ActionIntensity, ClutchMoment, Clip, ClipType, FrameAnalysis, MatchStatus, MomentumShift,
    MultiEvent, MultiEventKind, QualityScore, ShiftDirection, TimeRange,
};

use crate::decisions::{VarietyAnalysis, VarietyIssue};
use crate::error::DirectorResult;
use crate::stats::{mean, sample_variance};

/// Kills within this window count as one multi-kill run.
pub const MULTI_KILL_WINDOW_SECS: f64 = 10.0;

/// Excitement threshold above which a frame seeds its own clip.
const HIGH_EXCITEMENT_THRESHOLD: f64 = 25.0;

/// Moving-average window (frames) for momentum detection.
const MOMENTUM_WINDOW: usize = 5;

/// Mean-excitement change that counts as a momentum shift.
const MOMENTUM_THRESHOLD: f64 = 10.0;

/// Detects highlights, multi-events, clutch moments, and excitement levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightDetector;

impl HighlightDetector {
    pub fn new() -> Self {
        Self
    }

    /// Write excitement scores back into each analysis.
    pub fn score_excitement(&self, analyses: Vec<FrameAnalysis>) -> Vec<FrameAnalysis> {
        analyses
            .into_iter()
            .map(|mut analysis| {
                analysis.excitement_score = excitement_for(&analysis);
                analysis
            })
            .collect()
    }

    /// Detect rapid successive kills by sweeping a fixed window over the
    /// sorted kill timestamps.
    pub fn detect_multi_events(
        &self,
        analyses: &[FrameAnalysis],
        window_secs: f64,
    ) -> Vec<MultiEvent> {
        let mut kills: Vec<f64> = analyses
            .iter()
            .filter(|a| a.kill_log)
            .map(|a| a.timestamp)
            .collect();
        kills.sort_by(f64::total_cmp);

        let mut events = Vec::new();
        let mut i = 0;
        while i < kills.len() {
            let window_start = kills[i];
            let mut j = i + 1;
            while j < kills.len() && kills[j] - window_start <= window_secs {
                j += 1;
            }

            let count = j - i;
            if let Some(kind) = MultiEventKind::from_count(count) {
                events.push(MultiEvent {
                    kind,
                    timestamp: window_start,
                    kill_count: count,
                    end_timestamp: kills[j - 1],
                });
            }
            i = j;
        }
        events
    }

    /// Every frame observed in a clutch state.
    pub fn detect_clutch_moments(&self, analyses: &[FrameAnalysis]) -> Vec<ClutchMoment> {
        analyses
            .iter()
            .filter(|a| a.match_status == MatchStatus::Clutch)
            .map(|a| ClutchMoment {
                timestamp: a.timestamp,
                action_intensity: a.action_intensity,
            })
            .collect()
    }

    /// Detect momentum shifts from the moving average of excitement.
    pub fn detect_momentum_shifts(&self, analyses: &[FrameAnalysis]) -> Vec<MomentumShift> {
        let timeline: Vec<(f64, f64)> = analyses
            .iter()
            .filter(|a| a.excitement_score > 0.0)
            .map(|a| (a.timestamp, a.excitement_score))
            .collect();
        if timeline.len() < MOMENTUM_WINDOW * 2 {
            return Vec::new();
        }

        let mut shifts = Vec::new();
        for i in 0..timeline.len() - MOMENTUM_WINDOW * 2 {
            let before: Vec<f64> = timeline[i..i + MOMENTUM_WINDOW]
                .iter()
                .map(|(_, score)| *score)
                .collect();
            let after: Vec<f64> = timeline[i + MOMENTUM_WINDOW..i + MOMENTUM_WINDOW * 2]
                .iter()
                .map(|(_, score)| *score)
                .collect();

            let change = mean(&after) - mean(&before);
            if change.abs() > MOMENTUM_THRESHOLD {
                shifts.push(MomentumShift {
                    timestamp: timeline[i + MOMENTUM_WINDOW].0,
                    direction: if change > 0.0 {
                        ShiftDirection::Up
                    } else {
                        ShiftDirection::Down
                    },
                    magnitude: change.abs(),
                });
            }
        }
        shifts
    }

    /// Seed highlight clips from detected patterns, then merge overlaps.
    pub fn suggest_highlights(
        &self,
        analyses: &[FrameAnalysis],
        multi_events: &[MultiEvent],
        clutch_moments: &[ClutchMoment],
    ) -> DirectorResult<Vec<Clip>> {
        let mut highlights = Vec::new();

        for event in multi_events {
            highlights.push(Clip::new(
                TimeRange::new(event.timestamp - 3.0, event.end_timestamp + 3.0)?,
                ClipType::MultiKill,
                event.kind.label(),
                format!("{} ({} kills)", event.kind.label(), event.kill_count),
                10,
                QualityScore::new(90.0),
            ));
        }

        for moment in clutch_moments {
            highlights.push(Clip::new(
                TimeRange::new(moment.timestamp - 5.0, moment.timestamp + 5.0)?,
                ClipType::Clutch,
                "CLUTCH",
                "Clutch moment",
                9,
                QualityScore::new(80.0),
            ));
        }

        for analysis in analyses {
            if analysis.excitement_score >= HIGH_EXCITEMENT_THRESHOLD {
                highlights.push(Clip::new(
                    TimeRange::new(analysis.timestamp - 2.0, analysis.timestamp + 3.0)?,
                    ClipType::HighExcitement,
                    "INTENSE",
                    "High excitement",
                    7,
                    QualityScore::new(70.0),
                ));
            }
        }

        highlights.sort_by(|a, b| b.priority.cmp(&a.priority));
        self.merge_overlapping(highlights)
    }

    /// Merge overlapping clips, keeping the higher-priority one.
    pub fn merge_overlapping(&self, clips: Vec<Clip>) -> DirectorResult<Vec<Clip>> {
        let mut sorted = clips;
        sorted.sort_by(|a, b| a.start().total_cmp(&b.start()));

        let mut iter = sorted.into_iter();
        let mut merged: Vec<Clip> = Vec::new();
        if let Some(first) = iter.next() {
            merged.push(first);
        }

        for current in iter {
            let last_idx = merged.len() - 1;
            if current.start() <= merged[last_idx].end() {
                let combined = TimeRange::new(
                    merged[last_idx].start().min(current.start()),
                    merged[last_idx].end().max(current.end()),
                )?;
                let keep = if merged[last_idx].priority >= current.priority {
                    merged[last_idx].clone()
                } else {
                    current
                };
                merged[last_idx] = keep.with_range(combined);
            } else {
                merged.push(current);
            }
        }
        Ok(merged)
    }

    /// Analyze variety of clip types and durations.
    pub fn analyze_variety(&self, clips: &[Clip]) -> VarietyAnalysis {
        if clips.is_empty() {
            return VarietyAnalysis {
                variety_score: 0.0,
                unique_types: 0,
                duration_variance: 0.0,
                issues: vec![VarietyIssue::NoClips],
            };
        }

        let unique_types = clips
            .iter()
            .map(|c| c.clip_type)
            .collect::<HashSet<ClipType>>()
            .len();
        let durations: Vec<f64> = clips.iter().map(Clip::duration).collect();
        let duration_variance = sample_variance(&durations);

        let variety_score =
            (unique_types as f64 * 20.0 + (duration_variance * 5.0).min(30.0)).min(100.0);

        let mut issues = Vec::new();
        if unique_types < 2 {
            issues.push(VarietyIssue::LowTypeVariety);
        }
        if duration_variance < 2.0 {
            issues.push(VarietyIssue::UniformClipLengths);
        }

        VarietyAnalysis {
            variety_score,
            unique_types,
            duration_variance,
            issues,
        }
    }
}

/// Bounded-additive excitement for one frame.
fn excitement_for(analysis: &FrameAnalysis) -> f64 {
    let mut excitement = 0.0;

    if analysis.kill_log {
        excitement += 25.0;
    }
    if analysis.kill_count >= 3 {
        excitement += 15.0;
    } else if analysis.kill_count >= 2 {
        excitement += 8.0;
    }

    excitement += match analysis.action_intensity {
        ActionIntensity::VeryHigh => 25.0,
        ActionIntensity::High => 18.0,
        ActionIntensity::Medium => 10.0,
        ActionIntensity::Low => 0.0,
    };

    excitement += match analysis.match_status {
        MatchStatus::Victory => 10.0,
        MatchStatus::Clutch => 20.0,
        MatchStatus::Overtime => 12.0,
        MatchStatus::Defeat => -5.0,
        MatchStatus::Normal | MatchStatus::Unknown => 0.0,
    };

    if analysis.enemy_visible {
        excitement += 10.0;
    }
    if analysis.enemy_count >= 3 {
        excitement += 5.0;
    }

    // Zero confidence means "no opinion", not "worthless frame"
    if analysis.confidence > 0.0 {
        excitement *= 0.5 + 0.5 * analysis.confidence;
    }
    excitement
}
