//! Pipeline orchestration.
//!
//! Drives sampling, analysis, direction, and assembly as a state machine.
//! Each stage's inner 0-100 progress is projected into a fixed band of the
//! overall run before reaching the host.

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use reel_director::CreativeDirector;
use reel_media::{Assembler, KeyframeSampler, MediaBlob};
use reel_models::{CancelToken, Clip, ProgressEvent, StageLabel};
use reel_vision::VisionClient;
use tracing::{info, warn};

use crate::callbacks::PipelineCallbacks;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::stages::{FrameAnalyzer, FrameSource, ReelAssembler};
use crate::stats::PipelineStats;

/// Overall progress bands per stage.
const SAMPLING_BAND: (u8, u8) = (0, 25);
const ANALYZING_BAND: (u8, u8) = (25, 60);
const DIRECTING_BAND: (u8, u8) = (60, 75);
const ASSEMBLING_BAND: (u8, u8) = (75, 100);

/// Clamped clips shorter than this are dropped.
const MIN_CLAMPED_CLIP_SECS: f64 = 0.5;

/// Run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Idle,
    Sampling,
    Analyzing,
    Directing,
    Assembling,
    Done,
    Cancelled,
    Failed,
}

impl PipelinePhase {
    fn stage_label(&self) -> StageLabel {
        match self {
            Self::Idle | Self::Sampling => StageLabel::FrameExtraction,
            Self::Analyzing => StageLabel::AiAnalysis,
            Self::Directing => StageLabel::ClipDetection,
            Self::Assembling => StageLabel::VideoGeneration,
            Self::Done | Self::Cancelled | Self::Failed => StageLabel::Completed,
        }
    }
}

/// Drives one file through the four pipeline stages.
pub struct PipelineOrchestrator<S, A, B> {
    sampler: S,
    analyzer: A,
    assembler: B,
    director: CreativeDirector,
    callbacks: PipelineCallbacks,
    cancel: CancelToken,
    phase: Mutex<PipelinePhase>,
}

impl PipelineOrchestrator<KeyframeSampler, VisionClient, Assembler> {
    /// Wire the production components from configuration.
    pub fn new(config: PipelineConfig, callbacks: PipelineCallbacks) -> PipelineResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(PipelineError::AuthMissing);
        }
        let sampler = KeyframeSampler::new(config.sampler);
        let analyzer = VisionClient::with_http(config.vision, config.api_key)?;
        let assembler = Assembler::with_ffmpeg()?;
        Ok(Self::with_stages(
            sampler,
            analyzer,
            assembler,
            CreativeDirector::new(config.director),
            callbacks,
        ))
    }
}

impl<S, A, B> PipelineOrchestrator<S, A, B>
where
    S: FrameSource,
    A: FrameAnalyzer,
    B: ReelAssembler,
{
    /// Wire explicit stage implementations (tests use stubs here).
    pub fn with_stages(
        sampler: S,
        analyzer: A,
        assembler: B,
        director: CreativeDirector,
        callbacks: PipelineCallbacks,
    ) -> Self {
        Self {
            sampler,
            analyzer,
            assembler,
            director,
            callbacks,
            cancel: CancelToken::new(),
            phase: Mutex::new(PipelinePhase::Idle),
        }
    }

    /// Token shared with every stage; cancelling it ends the run at the next
    /// suspension point.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn phase(&self) -> PipelinePhase {
        *self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run the full pipeline on one file.
    pub async fn run(&self, input: &Path) -> PipelineResult<(MediaBlob, PipelineStats)> {
        let started = Instant::now();
        let result = self.run_inner(input, started).await;

        match &result {
            Ok((blob, stats)) => {
                self.set_phase(PipelinePhase::Done);
                self.emit(ProgressEvent::completion());
                if let Some(callback) = &self.callbacks.on_complete {
                    callback(blob, stats);
                }
            }
            Err(error) if error.is_cancelled() => {
                self.set_phase(PipelinePhase::Cancelled);
                self.log("run cancelled");
            }
            Err(error) => {
                let stage = self.phase().stage_label();
                self.set_phase(PipelinePhase::Failed);
                let message = error.user_message();
                warn!("Pipeline failed during {}: {}", stage, message);
                self.emit(ProgressEvent::error(stage, message.clone()));
                if let Some(callback) = &self.callbacks.on_error {
                    callback(&message);
                }
            }
        }
        result
    }

    async fn run_inner(
        &self,
        input: &Path,
        started: Instant,
    ) -> PipelineResult<(MediaBlob, PipelineStats)> {
        self.cancel.check()?;

        // Stage 1: sampling
        self.set_phase(PipelinePhase::Sampling);
        self.log("extracting frames");
        let (frames, info) = self
            .sampler
            .sample(
                input,
                &|p| {
                    self.emit_band(
                        StageLabel::FrameExtraction,
                        SAMPLING_BAND,
                        p.percent,
                        Some(format!("frame {}/{} at {:.1}s", p.current, p.total, p.timestamp)),
                    );
                },
                &self.cancel,
            )
            .await?;
        if frames.is_empty() {
            return Err(PipelineError::NoFrames);
        }

        // Stage 2: analysis
        self.set_phase(PipelinePhase::Analyzing);
        self.log("analyzing frames");
        let analyses = self
            .analyzer
            .analyze_batch(
                &frames,
                &|p| {
                    self.emit_band(
                        StageLabel::AiAnalysis,
                        ANALYZING_BAND,
                        p.percent,
                        Some(format!("analyzed {}/{} frames", p.completed, p.total)),
                    );
                },
                &self.cancel,
            )
            .await?;
        let valid: Vec<_> = analyses.iter().filter(|a| !a.is_failed()).cloned().collect();
        if valid.is_empty() {
            let first = analyses
                .iter()
                .find_map(|a| a.error_message())
                .unwrap_or("unknown analysis failure")
                .to_string();
            return Err(PipelineError::AllAnalysesFailed(first));
        }
        info!("{}/{} frames analyzed successfully", valid.len(), analyses.len());

        // Stage 3: creative direction
        self.set_phase(PipelinePhase::Directing);
        self.log("detecting highlights");
        self.emit_band(StageLabel::ClipDetection, DIRECTING_BAND, 0, None);
        let decisions = self.director.direct(&valid)?;
        self.cancel.check()?;
        self.emit_band(
            StageLabel::ClipDetection,
            DIRECTING_BAND,
            100,
            Some(format!("{} clips selected", decisions.clips.len())),
        );

        // Clamp everything to the true media duration before cutting
        let clips = clamp_clips(&decisions.clips, info.duration);
        if clips.is_empty() {
            return Err(PipelineError::NoHighlights);
        }
        let hook = decisions
            .hook_clip
            .as_ref()
            .and_then(|h| clamp_clip(h, info.duration));

        // Stage 4: assembly
        self.set_phase(PipelinePhase::Assembling);
        self.log("cutting and concatenating clips");
        let blob = self
            .assembler
            .assemble(
                input,
                &clips,
                hook.as_ref(),
                &|p| {
                    self.emit_band(
                        StageLabel::VideoGeneration,
                        ASSEMBLING_BAND,
                        p.percent,
                        Some(p.message.clone()),
                    );
                },
                &self.cancel,
            )
            .await?;

        let stats = PipelineStats::build(
            &decisions,
            &clips,
            blob.len(),
            started.elapsed().as_secs_f64(),
        );
        info!(
            "Pipeline complete: {} clips, {:.1}s reel, quality {}",
            stats.clip_count, stats.total_duration, stats.quality_score
        );
        Ok((blob, stats))
    }

    fn set_phase(&self, phase: PipelinePhase) {
        *self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = phase;
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(callback) = &self.callbacks.on_progress {
            callback(event);
        }
    }

    fn emit_band(
        &self,
        stage: StageLabel,
        band: (u8, u8),
        inner_percent: u8,
        message: Option<String>,
    ) {
        let mut event = ProgressEvent::progress(stage, project(band, inner_percent));
        event.message = message;
        self.emit(event);
    }

    fn log(&self, message: &str) {
        info!("{message}");
        if let Some(callback) = &self.callbacks.on_log {
            callback(message);
        }
    }
}

/// Linearly map a stage-local percent into its overall band.
fn project(band: (u8, u8), inner_percent: u8) -> u8 {
    let (lo, hi) = band;
    let span = (hi - lo) as f64;
    lo + (span * inner_percent.min(100) as f64 / 100.0).round() as u8
}

/// Intersect a clip with `[0, duration]`; drop it when too little remains.
fn clamp_clip(clip: &Clip, duration: f64) -> Option<Clip> {
    let range = clip.time_range.clamp_to(duration)?;
    if range.duration() < MIN_CLAMPED_CLIP_SECS {
        return None;
    }
    Some(clip.with_range(range))
}

/// Clamp all clips, preserving order.
fn clamp_clips(clips: &[Clip], duration: f64) -> Vec<Clip> {
    clips
        .iter()
        .filter_map(|clip| clamp_clip(clip, duration))
        .collect()
}
