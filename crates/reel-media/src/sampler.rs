//! Keyframe sampling.
//!
//! Pulls uniformly spaced stills out of the source video as downscaled JPEGs.
//! Each still is decoded by seeking FFmpeg to the target timestamp and
//! rendering exactly one frame.

use std::path::Path;
use std::time::Duration;

use reel_models::{CancelToken, Frame};
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_video, VideoInfo};

/// Keyframe sampling configuration.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Spacing between sampled frames, seconds
    pub interval_seconds: f64,
    /// Hard cap on the number of sampled frames
    pub max_frames: usize,
    /// JPEG quality in [0, 1] (1 = best)
    pub jpeg_quality: f64,
    /// Maximum frame width in pixels (proportional downscale)
    pub max_width: u32,
    /// Deadline for a single seek+decode
    pub seek_timeout: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 10.0,
            max_frames: 60,
            jpeg_quality: 0.85,
            max_width: 1280,
            seek_timeout: Duration::from_secs(30),
        }
    }
}

impl SamplerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval_seconds: std::env::var("REEL_FRAME_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.interval_seconds),
            max_frames: std::env::var("REEL_MAX_FRAMES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_frames),
            jpeg_quality: std::env::var("REEL_JPEG_QUALITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.jpeg_quality),
            max_width: std::env::var("REEL_FRAME_MAX_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_width),
            seek_timeout: Duration::from_secs(
                std::env::var("REEL_SEEK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.seek_timeout.as_secs()),
            ),
        }
    }
}

/// Progress of a sampling pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleProgress {
    pub current: usize,
    pub total: usize,
    /// 0-100 within this stage
    pub percent: u8,
    /// Timestamp of the frame just sampled
    pub timestamp: f64,
}

/// Samples uniformly spaced keyframes from a local video file.
#[derive(Debug, Clone)]
pub struct KeyframeSampler {
    config: SamplerConfig,
}

impl KeyframeSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// Sample keyframes from `input`.
    ///
    /// Returns the sampled frames in timestamp order together with the probed
    /// video info. An empty result means the configured cap allows no frames;
    /// the caller decides whether that is fatal.
    pub async fn sample<F>(
        &self,
        input: &Path,
        on_progress: F,
        cancel: &CancelToken,
    ) -> MediaResult<(Vec<Frame>, VideoInfo)>
    where
        F: Fn(SampleProgress),
    {
        let info = probe_video(input).await?;
        if !info.duration.is_finite() || info.duration <= 0.0 {
            return Err(MediaError::MetadataUnavailable(
                input.display().to_string(),
            ));
        }

        let total = self.frame_count(info.duration);
        info!(
            "Sampling {} frames from {} ({:.1}s, {}x{})",
            total,
            input.display(),
            info.duration,
            info.width,
            info.height
        );
        if total == 0 {
            return Ok((Vec::new(), info));
        }

        // Scratch dir is removed on every exit path when dropped
        let scratch = tempfile::tempdir()?;
        let mut frames = Vec::with_capacity(total);

        for i in 0..total {
            cancel.check()?;

            let timestamp = i as f64 * self.config.interval_seconds;
            if timestamp > info.duration {
                break;
            }

            let still = scratch.path().join(format!("frame_{i:04}.jpg"));
            self.extract_still(input, &still, timestamp, cancel).await?;
            let image = tokio::fs::read(&still).await?;
            debug!("Sampled frame {} at {:.2}s ({} bytes)", i, timestamp, image.len());
            frames.push(Frame::new(timestamp, image));

            let current = i + 1;
            on_progress(SampleProgress {
                current,
                total,
                percent: stage_percent(current, total),
                timestamp,
            });
        }

        info!("Sampling complete: {} frames", frames.len());
        Ok((frames, info))
    }

    /// Number of frames to sample for a given duration.
    fn frame_count(&self, duration: f64) -> usize {
        if self.config.interval_seconds <= 0.0 {
            return 0;
        }
        let by_duration = (duration / self.config.interval_seconds).floor() as usize + 1;
        by_duration.min(self.config.max_frames)
    }

    /// Decode one downscaled JPEG still at `timestamp`.
    async fn extract_still(
        &self,
        input: &Path,
        output: &Path,
        timestamp: f64,
        cancel: &CancelToken,
    ) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(input, output)
            .seek(timestamp)
            .single_frame()
            .video_filter(format!("scale='min({},iw)':-2", self.config.max_width))
            .jpeg_quality(jpeg_qscale(self.config.jpeg_quality));

        let runner = FfmpegRunner::new()
            .with_timeout(self.config.seek_timeout)
            .with_cancel(cancel.clone());

        match runner.run(&cmd).await {
            // A seek that never resolves within the deadline aborts the run
            Err(MediaError::Timeout(_)) => Err(MediaError::SeekFailed { timestamp }),
            other => other,
        }
    }
}

/// Map quality in [0, 1] to FFmpeg's JPEG qscale (2 = best, 31 = worst).
fn jpeg_qscale(quality: f64) -> u8 {
    let quality = quality.clamp(0.0, 1.0);
    (2.0 + (1.0 - quality) * 29.0).round() as u8
}

fn stage_percent(current: usize, total: usize) -> u8 {
    ((current as f64 / total as f64) * 100.0).round() as u8
}
