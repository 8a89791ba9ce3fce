//! Stage seams.
//!
//! The orchestrator depends on these traits instead of the concrete
//! components so integration tests can run end-to-end against stubs.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use reel_media::{
    AssembleProgress, Assembler, KeyframeSampler, MediaBlob, MediaResult, SampleProgress,
    VideoInfo,
};
use reel_models::{CancelToken, Clip, Frame, FrameAnalysis};
use reel_vision::{BatchProgress, VisionClient, VisionResult};

/// Produces frames and media info from a local video file.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn sample(
        &self,
        input: &Path,
        on_progress: &(dyn Fn(SampleProgress) + Send + Sync),
        cancel: &CancelToken,
    ) -> MediaResult<(Vec<Frame>, VideoInfo)>;
}

/// Turns frames into analyses, preserving input order and length.
#[async_trait]
pub trait FrameAnalyzer: Send + Sync {
    async fn analyze_batch(
        &self,
        frames: &[Frame],
        on_progress: &(dyn Fn(BatchProgress) + Send + Sync),
        cancel: &CancelToken,
    ) -> VisionResult<Vec<FrameAnalysis>>;
}

/// Cuts and concatenates the chosen clips from the source media.
#[async_trait]
pub trait ReelAssembler: Send + Sync {
    async fn assemble(
        &self,
        source: &Path,
        clips: &[Clip],
        hook: Option<&Clip>,
        on_progress: &(dyn Fn(AssembleProgress) + Send + Sync),
        cancel: &CancelToken,
    ) -> MediaResult<MediaBlob>;
}

#[async_trait]
impl FrameSource for KeyframeSampler {
    async fn sample(
        &self,
        input: &Path,
        on_progress: &(dyn Fn(SampleProgress) + Send + Sync),
        cancel: &CancelToken,
    ) -> MediaResult<(Vec<Frame>, VideoInfo)> {
        KeyframeSampler::sample(self, input, |progress| on_progress(progress), cancel).await
    }
}

#[async_trait]
impl FrameAnalyzer for VisionClient {
    async fn analyze_batch(
        &self,
        frames: &[Frame],
        on_progress: &(dyn Fn(BatchProgress) + Send + Sync),
        cancel: &CancelToken,
    ) -> VisionResult<Vec<FrameAnalysis>> {
        VisionClient::analyze_batch(self, frames, |progress| on_progress(progress), cancel).await
    }
}

#[async_trait]
impl ReelAssembler for Assembler {
    async fn assemble(
        &self,
        source: &Path,
        clips: &[Clip],
        hook: Option<&Clip>,
        on_progress: &(dyn Fn(AssembleProgress) + Send + Sync),
        cancel: &CancelToken,
    ) -> MediaResult<MediaBlob> {
        Assembler::assemble(self, source, clips, hook, |progress| on_progress(progress), cancel)
            .await
    }
}

#[async_trait]
impl<T: ReelAssembler + ?Sized> ReelAssembler for Arc<T> {
    async fn assemble(
        &self,
        source: &Path,
        clips: &[Clip],
        hook: Option<&Clip>,
        on_progress: &(dyn Fn(AssembleProgress) + Send + Sync),
        cancel: &CancelToken,
    ) -> MediaResult<MediaBlob> {
        self.as_ref().assemble(source, clips, hook, on_progress, cancel).await
    }
}
