//! Reel assembly.
//!
//! Extracts each chosen interval from the original media by stream-copy and
//! concatenates the pieces, preserving the input codec throughout.

use std::path::Path;
use std::sync::Arc;

use reel_models::{CancelToken, Clip};
use tracing::{info, warn};

use crate::blob::{mime_for_source, MediaBlob};
use crate::error::{MediaError, MediaResult};
use crate::toolchain::{FfmpegToolchain, MediaToolchain};

/// Progress of an assembly pass, 0-100 within this stage.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembleProgress {
    pub percent: u8,
    pub message: String,
}

/// Cuts and concatenates highlight clips without re-encoding.
pub struct Assembler {
    toolchain: Arc<dyn MediaToolchain>,
}

impl Assembler {
    pub fn new(toolchain: Arc<dyn MediaToolchain>) -> Self {
        Self { toolchain }
    }

    /// Create an assembler backed by the system FFmpeg.
    pub fn with_ffmpeg() -> MediaResult<Self> {
        Ok(Self::new(Arc::new(FfmpegToolchain::new()?)))
    }

    /// Assemble `clips` (hook first when present) into a single media blob.
    ///
    /// Preconditions: `clips` is non-empty, pairwise non-overlapping, sorted
    /// in the intended playback order, and within the source duration.
    pub async fn assemble<F>(
        &self,
        source: &Path,
        clips: &[Clip],
        hook: Option<&Clip>,
        on_progress: F,
        cancel: &CancelToken,
    ) -> MediaResult<MediaBlob>
    where
        F: Fn(AssembleProgress) + Send + Sync,
    {
        if clips.is_empty() {
            return Err(MediaError::internal("no clips to assemble"));
        }

        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "mp4".to_string());

        // Sandbox is removed when dropped, on every exit path
        let sandbox = tempfile::tempdir()?;
        self.assemble_in(sandbox.path(), source, &ext, clips, hook, &on_progress, cancel)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn assemble_in(
        &self,
        dir: &Path,
        source: &Path,
        ext: &str,
        clips: &[Clip],
        hook: Option<&Clip>,
        on_progress: &(dyn Fn(AssembleProgress) + Send + Sync),
        cancel: &CancelToken,
    ) -> MediaResult<MediaBlob> {
        let ordered: Vec<&Clip> = hook.into_iter().chain(clips.iter()).collect();
        let total = ordered.len();
        info!(
            "Assembling {} clips from {} (hook: {})",
            total,
            source.display(),
            hook.is_some()
        );

        // Extraction: 0-80%
        let mut parts = Vec::with_capacity(total);
        for (i, clip) in ordered.iter().enumerate() {
            cancel.check()?;

            let part = dir.join(format!("clip_{i:03}.{ext}"));
            self.toolchain
                .cut(source, clip.start(), clip.duration(), &part)
                .await?;
            parts.push(part);

            let percent = (((i + 1) as f64 / total as f64) * 80.0).round() as u8;
            on_progress(AssembleProgress {
                percent,
                message: format!("extracted clip {}/{}", i + 1, total),
            });
        }

        cancel.check()?;

        // Concat: 80-95%
        let manifest = dir.join("concat.txt");
        let mut listing = String::new();
        for part in &parts {
            listing.push_str(&format!("file '{}'\n", part.display()));
        }
        self.toolchain.write_file(&manifest, listing.as_bytes()).await?;

        let output = dir.join(format!("output.{ext}"));
        self.toolchain.concat(&manifest, &output).await?;
        on_progress(AssembleProgress {
            percent: 95,
            message: "clips concatenated".to_string(),
        });

        // Finalise: 95-100%
        let bytes = self.toolchain.read_file(&output).await?;
        self.cleanup(&parts, &manifest, &output).await;
        on_progress(AssembleProgress {
            percent: 100,
            message: "output finalized".to_string(),
        });

        Ok(MediaBlob::new(bytes, mime_for_source(source)))
    }

    /// Best-effort removal of intermediates; failure never fails the run.
    async fn cleanup(&self, parts: &[std::path::PathBuf], manifest: &Path, output: &Path) {
        for path in parts
            .iter()
            .map(|p| p.as_path())
            .chain([manifest, output])
        {
            if let Err(e) = self.toolchain.delete_file(path).await {
                warn!("Failed to remove intermediate {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reel_models::{ClipType, QualityScore, TimeRange};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Cut { start: f64, duration: f64, output: String },
        Concat,
    }

    /// Records toolchain calls and keeps an in-memory filesystem.
    #[derive(Default)]
    struct StubToolchain {
        calls: Mutex<Vec<Call>>,
        files: Mutex<HashMap<PathBuf, Vec<u8>>>,
        fail_deletes: bool,
        fail_cut: bool,
    }

    impl StubToolchain {
        fn file_name(path: &Path) -> String {
            path.file_name().unwrap().to_string_lossy().to_string()
        }
    }

    #[async_trait]
    impl MediaToolchain for StubToolchain {
        async fn cut(
            &self,
            _input: &Path,
            start: f64,
            duration: f64,
            output: &Path,
        ) -> MediaResult<()> {
            if self.fail_cut {
                return Err(MediaError::ffmpeg_failed(
                    "boom",
                    Some("stream copy failed".to_string()),
                    Some(1),
                ));
            }
            self.calls.lock().unwrap().push(Call::Cut {
                start,
                duration,
                output: Self::file_name(output),
            });
            self.files
                .lock()
                .unwrap()
                .insert(output.to_path_buf(), format!("cut@{start}").into_bytes());
            Ok(())
        }

        async fn concat(&self, list: &Path, output: &Path) -> MediaResult<()> {
            self.calls.lock().unwrap().push(Call::Concat);
            let manifest = self.files.lock().unwrap().get(list).cloned().unwrap();
            let mut joined = b"reel:".to_vec();
            joined.extend_from_slice(&manifest);
            self.files.lock().unwrap().insert(output.to_path_buf(), joined);
            Ok(())
        }

        async fn write_file(&self, path: &Path, bytes: &[u8]) -> MediaResult<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), bytes.to_vec());
            Ok(())
        }

        async fn read_file(&self, path: &Path) -> MediaResult<Vec<u8>> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| MediaError::FileNotFound(path.to_path_buf()))
        }

        async fn delete_file(&self, path: &Path) -> MediaResult<()> {
            if self.fail_deletes {
                return Err(MediaError::internal("delete refused"));
            }
            self.files.lock().unwrap().remove(path);
            Ok(())
        }
    }

    fn clip(start: f64, end: f64) -> Clip {
        Clip::new(
            TimeRange::new(start, end).unwrap(),
            ClipType::HighExcitement,
            "INTENSE",
            "High excitement",
            7,
            QualityScore::new(70.0),
        )
    }

    fn assembler(stub: Arc<StubToolchain>) -> Assembler {
        Assembler::new(stub)
    }

    #[tokio::test]
    async fn test_hook_is_extracted_first() {
        let stub = Arc::new(StubToolchain::default());
        let clips = vec![clip(10.0, 15.0), clip(30.0, 40.0)];
        let hook = clip(20.0, 23.0).into_hook();

        let blob = assembler(stub.clone())
            .assemble(
                Path::new("source.mp4"),
                &clips,
                Some(&hook),
                |_| {},
                &CancelToken::new(),
            )
            .await
            .unwrap();

        let calls = stub.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                Call::Cut { start: 20.0, duration: 3.0, output: "clip_000.mp4".into() },
                Call::Cut { start: 10.0, duration: 5.0, output: "clip_001.mp4".into() },
                Call::Cut { start: 30.0, duration: 10.0, output: "clip_002.mp4".into() },
                Call::Concat,
            ]
        );
        assert_eq!(blob.mime, "video/mp4");
        assert!(blob.bytes.starts_with(b"reel:"));
    }

    #[tokio::test]
    async fn test_manifest_lists_parts_in_order() {
        let stub = Arc::new(StubToolchain::default());
        let clips = vec![clip(0.0, 4.0), clip(8.0, 12.0)];

        let blob = assembler(stub.clone())
            .assemble(Path::new("video.mkv"), &clips, None, |_| {}, &CancelToken::new())
            .await
            .unwrap();

        let manifest = String::from_utf8(blob.bytes["reel:".len()..].to_vec()).unwrap();
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("file '") && lines[0].contains("clip_000.mkv"));
        assert!(lines[1].contains("clip_001.mkv"));
        assert_eq!(blob.mime, "video/x-matroska");
    }

    #[tokio::test]
    async fn test_progress_bands() {
        let stub = Arc::new(StubToolchain::default());
        let clips = vec![clip(0.0, 4.0), clip(8.0, 12.0)];
        let seen = Mutex::new(Vec::new());

        assembler(stub)
            .assemble(
                Path::new("video.mp4"),
                &clips,
                None,
                |p| seen.lock().unwrap().push(p.percent),
                &CancelToken::new(),
            )
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![40, 80, 95, 100]);
    }

    #[tokio::test]
    async fn test_empty_clip_list_rejected() {
        let stub = Arc::new(StubToolchain::default());
        let result = assembler(stub)
            .assemble(Path::new("video.mp4"), &[], None, |_| {}, &CancelToken::new())
            .await;
        assert!(matches!(result, Err(MediaError::Internal(_))));
    }

    #[tokio::test]
    async fn test_cancellation_between_extractions() {
        let stub = Arc::new(StubToolchain::default());
        let clips = vec![clip(0.0, 4.0), clip(8.0, 12.0)];
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = assembler(stub.clone())
            .assemble(Path::new("video.mp4"), &clips, None, |_| {}, &cancel)
            .await;
        assert!(matches!(result, Err(MediaError::Cancelled(_))));
        assert!(stub.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_failure_does_not_fail_run() {
        let stub = Arc::new(StubToolchain {
            fail_deletes: true,
            ..StubToolchain::default()
        });
        let clips = vec![clip(0.0, 4.0)];

        let result = assembler(stub)
            .assemble(Path::new("video.mp4"), &clips, None, |_| {}, &CancelToken::new())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_extraction_failure_surfaces_stderr() {
        let stub = Arc::new(StubToolchain {
            fail_cut: true,
            ..StubToolchain::default()
        });
        let clips = vec![clip(0.0, 4.0)];

        let err = assembler(stub)
            .assemble(Path::new("video.mp4"), &clips, None, |_| {}, &CancelToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.stderr_tail(), Some("stream copy failed"));
    }
}
