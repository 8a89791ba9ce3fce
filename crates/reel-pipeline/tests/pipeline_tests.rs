//! End-to-end orchestrator tests over stubbed stages.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use reel_director::{CreativeDirector, DirectorConfig};
use reel_media::{AssembleProgress, MediaBlob, MediaResult, SampleProgress, VideoInfo};
use reel_models::{
    ActionIntensity, CancelToken, Clip, Frame, FrameAnalysis, MatchStatus, ProgressEvent,
    ProgressKind, StageLabel,
};
use reel_pipeline::{
    FrameAnalyzer, FrameSource, PipelineCallbacks, PipelineError, PipelineOrchestrator,
    ReelAssembler,
};
use reel_vision::{BatchProgress, VisionResult};

const MEDIA_DURATION: f64 = 305.0;

struct StubSource {
    frames: Vec<Frame>,
    duration: f64,
}

#[async_trait]
impl FrameSource for StubSource {
    async fn sample(
        &self,
        _input: &Path,
        on_progress: &(dyn Fn(SampleProgress) + Send + Sync),
        cancel: &CancelToken,
    ) -> MediaResult<(Vec<Frame>, VideoInfo)> {
        cancel.check()?;
        let total = self.frames.len().max(1);
        for (i, frame) in self.frames.iter().enumerate() {
            on_progress(SampleProgress {
                current: i + 1,
                total,
                percent: (((i + 1) as f64 / total as f64) * 100.0).round() as u8,
                timestamp: frame.timestamp,
            });
        }
        Ok((
            self.frames.clone(),
            VideoInfo {
                duration: self.duration,
                width: 1920,
                height: 1080,
                fps: 60.0,
                codec: "h264".to_string(),
                size: 1 << 30,
            },
        ))
    }
}

struct StubAnalyzer {
    analyses: Vec<FrameAnalysis>,
}

#[async_trait]
impl FrameAnalyzer for StubAnalyzer {
    async fn analyze_batch(
        &self,
        frames: &[Frame],
        on_progress: &(dyn Fn(BatchProgress) + Send + Sync),
        cancel: &CancelToken,
    ) -> VisionResult<Vec<FrameAnalysis>> {
        cancel.check()?;
        let total = frames.len().max(1);
        for i in 0..frames.len() {
            on_progress(BatchProgress {
                completed: i + 1,
                total,
                percent: (((i + 1) as f64 / total as f64) * 100.0).round() as u8,
            });
        }
        Ok(self.analyses.clone())
    }
}

#[derive(Default)]
struct StubAssembler {
    /// (hook range, clip ranges) seen by the last assemble call.
    seen: Mutex<Option<(Option<(f64, f64)>, Vec<(f64, f64)>)>>,
}

#[async_trait]
impl ReelAssembler for StubAssembler {
    async fn assemble(
        &self,
        _source: &Path,
        clips: &[Clip],
        hook: Option<&Clip>,
        on_progress: &(dyn Fn(AssembleProgress) + Send + Sync),
        cancel: &CancelToken,
    ) -> MediaResult<MediaBlob> {
        cancel.check()?;
        let ranges: Vec<(f64, f64)> = clips.iter().map(|c| (c.start(), c.end())).collect();
        *self.seen.lock().unwrap() = Some((hook.map(|h| (h.start(), h.end())), ranges));

        // Deterministic bytes derived from the cut list
        let mut listing = String::new();
        if let Some(h) = hook {
            listing.push_str(&format!("hook:{:.2}-{:.2};", h.start(), h.end()));
        }
        for clip in clips {
            listing.push_str(&format!("{:.2}-{:.2};", clip.start(), clip.end()));
        }
        on_progress(AssembleProgress {
            percent: 100,
            message: "output finalized".to_string(),
        });
        Ok(MediaBlob::new(listing.into_bytes(), "video/mp4"))
    }
}

/// Thirty-one frames, 10s apart: a double kill, a clutch stretch, and one
/// medium-action skirmish.
fn demo_analyses() -> Vec<FrameAnalysis> {
    (0..=30)
        .map(|i| {
            let timestamp = i as f64 * 10.0;
            let mut a = FrameAnalysis::degraded(timestamp, "stub-model");
            match i {
                3 | 4 => {
                    a.kill_log = true;
                    a.action_intensity = ActionIntensity::VeryHigh;
                    a.enemy_visible = true;
                }
                10 => {
                    a.match_status = MatchStatus::Clutch;
                    a.action_intensity = ActionIntensity::High;
                }
                20 => {
                    a.action_intensity = ActionIntensity::Medium;
                    a.enemy_visible = true;
                    a.enemy_count = 3;
                }
                _ => {}
            }
            a
        })
        .collect()
}

fn demo_frames() -> Vec<Frame> {
    (0..=30)
        .map(|i| Frame::new(i as f64 * 10.0, vec![0xFF, 0xD8, i as u8]))
        .collect()
}

fn orchestrator_with(
    analyses: Vec<FrameAnalysis>,
    callbacks: PipelineCallbacks,
) -> PipelineOrchestrator<StubSource, StubAnalyzer, Arc<StubAssembler>> {
    PipelineOrchestrator::with_stages(
        StubSource {
            frames: demo_frames(),
            duration: MEDIA_DURATION,
        },
        StubAnalyzer { analyses },
        Arc::new(StubAssembler::default()),
        CreativeDirector::new(DirectorConfig::default()),
        callbacks,
    )
}

#[tokio::test]
async fn test_happy_path_produces_reel_and_stats() {
    let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(false));

    let events_sink = events.clone();
    let completed_flag = completed.clone();
    let callbacks = PipelineCallbacks::new()
        .on_progress(move |event| events_sink.lock().unwrap().push(event))
        .on_complete(move |_, _| *completed_flag.lock().unwrap() = true);

    let orchestrator = orchestrator_with(demo_analyses(), callbacks);
    let (blob, stats) = orchestrator.run(Path::new("game.mp4")).await.unwrap();

    assert!(!blob.is_empty());
    assert!(stats.clip_count >= 1);
    assert_eq!(stats.output_size, blob.len());
    assert!(stats.total_duration > 0.0);
    assert_eq!(stats.quality_score, stats.engagement.overall_score);
    assert!(*completed.lock().unwrap());

    let events = events.lock().unwrap();
    // Progress only climbs, stays in 0-100, and ends with completion
    let percents: Vec<u8> = events
        .iter()
        .filter(|e| e.kind == ProgressKind::Progress)
        .map(|e| e.progress)
        .collect();
    assert!(!percents.is_empty());
    assert!(percents.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(percents.iter().all(|p| *p <= 100));
    let last = events.last().unwrap();
    assert_eq!(last.kind, ProgressKind::Completion);
    assert_eq!(last.stage, StageLabel::Completed);
    assert_eq!(last.progress, 100);
}

#[tokio::test]
async fn test_stage_bands_are_respected() {
    let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let events_sink = events.clone();
    let callbacks =
        PipelineCallbacks::new().on_progress(move |event| events_sink.lock().unwrap().push(event));

    let orchestrator = orchestrator_with(demo_analyses(), callbacks);
    orchestrator.run(Path::new("game.mp4")).await.unwrap();

    for event in events.lock().unwrap().iter() {
        let (lo, hi) = match event.stage {
            StageLabel::FrameExtraction => (0, 25),
            StageLabel::AiAnalysis => (25, 60),
            StageLabel::ClipDetection => (60, 75),
            StageLabel::VideoGeneration => (75, 100),
            StageLabel::Completed => (100, 100),
        };
        assert!(
            event.progress >= lo && event.progress <= hi,
            "{} outside band for {}",
            event.progress,
            event.stage
        );
    }
}

#[tokio::test]
async fn test_runs_are_deterministic() {
    let first = orchestrator_with(demo_analyses(), PipelineCallbacks::new());
    let second = orchestrator_with(demo_analyses(), PipelineCallbacks::new());

    let (blob_a, stats_a) = first.run(Path::new("game.mp4")).await.unwrap();
    let (blob_b, stats_b) = second.run(Path::new("game.mp4")).await.unwrap();

    // Identical cut lists, identical stats modulo wall-clock time
    assert_eq!(blob_a.bytes, blob_b.bytes);
    let mut stats_a = stats_a;
    let mut stats_b = stats_b;
    stats_a.processing_time_secs = 0.0;
    stats_b.processing_time_secs = 0.0;
    assert_eq!(stats_a, stats_b);
}

#[tokio::test]
async fn test_hook_is_passed_first_and_clamped_clips_fit_media() {
    let assembler = Arc::new(StubAssembler::default());
    let orchestrator = PipelineOrchestrator::with_stages(
        StubSource {
            frames: demo_frames(),
            duration: MEDIA_DURATION,
        },
        StubAnalyzer {
            analyses: demo_analyses(),
        },
        assembler.clone(),
        CreativeDirector::new(DirectorConfig::default()),
        PipelineCallbacks::new(),
    );
    orchestrator.run(Path::new("game.mp4")).await.unwrap();

    let seen = assembler.seen.lock().unwrap().clone().unwrap();
    let (hook, ranges) = seen;
    let (hook_start, hook_end) = hook.expect("hook should survive clamping");
    assert!(hook_end - hook_start <= 3.0 + 1e-9);
    for (start, end) in ranges {
        assert!(start >= 0.0);
        assert!(end <= MEDIA_DURATION);
        assert!(end - start >= 0.5);
    }
}

#[tokio::test]
async fn test_no_frames_terminates_run() {
    let errors: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let errors_sink = errors.clone();
    let callbacks =
        PipelineCallbacks::new().on_error(move |msg| errors_sink.lock().unwrap().push(msg.to_string()));

    let orchestrator = PipelineOrchestrator::with_stages(
        StubSource {
            frames: Vec::new(),
            duration: MEDIA_DURATION,
        },
        StubAnalyzer {
            analyses: Vec::new(),
        },
        Arc::new(StubAssembler::default()),
        CreativeDirector::new(DirectorConfig::default()),
        callbacks,
    );

    let result = orchestrator.run(Path::new("game.mp4")).await;
    assert!(matches!(result, Err(PipelineError::NoFrames)));
    assert_eq!(*errors.lock().unwrap(), vec!["No frames extractable"]);
}

#[tokio::test]
async fn test_all_sentinel_analyses_terminate_run_with_first_error() {
    let analyses: Vec<FrameAnalysis> = (0..5)
        .map(|i| FrameAnalysis::failed(i as f64 * 10.0, format!("connection reset #{i}")))
        .collect();

    let orchestrator = orchestrator_with(analyses, PipelineCallbacks::new());
    let result = orchestrator.run(Path::new("game.mp4")).await;

    match result {
        Err(PipelineError::AllAnalysesFailed(first)) => {
            assert_eq!(first, "connection reset #0");
        }
        other => panic!("expected AllAnalysesFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_quiet_footage_yields_no_highlights() {
    let analyses: Vec<FrameAnalysis> = (0..=30)
        .map(|i| FrameAnalysis::degraded(i as f64 * 10.0, "stub-model"))
        .collect();

    let orchestrator = orchestrator_with(analyses, PipelineCallbacks::new());
    let result = orchestrator.run(Path::new("game.mp4")).await;
    assert!(matches!(result, Err(PipelineError::NoHighlights)));
}

#[tokio::test]
async fn test_cancellation_is_silent() {
    let errors: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let errors_sink = errors.clone();
    let callbacks =
        PipelineCallbacks::new().on_error(move |msg| errors_sink.lock().unwrap().push(msg.to_string()));

    let orchestrator = orchestrator_with(demo_analyses(), callbacks);
    orchestrator.cancel();
    orchestrator.cancel(); // idempotent

    let result = orchestrator.run(Path::new("game.mp4")).await;
    assert!(matches!(result, Err(ref e) if e.is_cancelled()));
    // Cancellation is log-only: no error callback
    assert!(errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_mixed_sentinels_still_direct_on_valid_frames() {
    let mut analyses = demo_analyses();
    analyses[1] = FrameAnalysis::failed(10.0, "timed out");
    analyses[2] = FrameAnalysis::failed(20.0, "timed out");

    let orchestrator = orchestrator_with(analyses, PipelineCallbacks::new());
    let (_, stats) = orchestrator.run(Path::new("game.mp4")).await.unwrap();
    assert!(stats.clip_count >= 1);
}
