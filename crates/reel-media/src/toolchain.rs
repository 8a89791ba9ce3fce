//! Media toolchain abstraction.
//!
//! The assembler talks to the toolchain through this trait so tests can swap
//! in a recording stub.

use std::path::Path;

use async_trait::async_trait;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Cut/concat/file operations the assembler needs.
#[async_trait]
pub trait MediaToolchain: Send + Sync {
    /// Stream-copy `[start, start + duration)` of `input` into `output`.
    async fn cut(
        &self,
        input: &Path,
        start: f64,
        duration: f64,
        output: &Path,
    ) -> MediaResult<()>;

    /// Concat-demux the files listed in `list` into `output`, stream-copied.
    async fn concat(&self, list: &Path, output: &Path) -> MediaResult<()>;

    async fn write_file(&self, path: &Path, bytes: &[u8]) -> MediaResult<()>;

    async fn read_file(&self, path: &Path) -> MediaResult<Vec<u8>>;

    async fn delete_file(&self, path: &Path) -> MediaResult<()>;
}

/// FFmpeg-backed toolchain.
#[derive(Debug, Clone, Default)]
pub struct FfmpegToolchain;

impl FfmpegToolchain {
    /// Create the toolchain, verifying FFmpeg is available.
    pub fn new() -> MediaResult<Self> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;
        Ok(Self)
    }
}

#[async_trait]
impl MediaToolchain for FfmpegToolchain {
    async fn cut(
        &self,
        input: &Path,
        start: f64,
        duration: f64,
        output: &Path,
    ) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(input, output)
            .seek(start)
            .duration(duration)
            .codec_copy()
            .normalize_timestamps();
        FfmpegRunner::new().run(&cmd).await
    }

    async fn concat(&self, list: &Path, output: &Path) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(list, output)
            .input_args(["-f", "concat", "-safe", "0"])
            .codec_copy();
        FfmpegRunner::new().run(&cmd).await
    }

    async fn write_file(&self, path: &Path, bytes: &[u8]) -> MediaResult<()> {
        tokio::fs::write(path, bytes).await.map_err(MediaError::from)
    }

    async fn read_file(&self, path: &Path) -> MediaResult<Vec<u8>> {
        tokio::fs::read(path).await.map_err(MediaError::from)
    }

    async fn delete_file(&self, path: &Path) -> MediaResult<()> {
        tokio::fs::remove_file(path).await.map_err(MediaError::from)
    }
}
