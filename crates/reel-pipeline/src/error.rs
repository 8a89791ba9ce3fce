//! Pipeline error types.

use reel_director::DirectorError;
use reel_media::MediaError;
use reel_models::Cancelled;
use reel_vision::VisionError;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("API credential not set")]
    AuthMissing,

    #[error("no frames could be extracted")]
    NoFrames,

    #[error("all frame analyses failed: {0}")]
    AllAnalysesFailed(String),

    #[error("no highlights detected")]
    NoHighlights,

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error(transparent)]
    Director(#[from] DirectorError),

    #[error("run cancelled")]
    Cancelled(#[from] Cancelled),
}

impl PipelineError {
    /// Whether this termination was a user cancellation (log only, no
    /// error callback).
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Cancelled(_)
                | Self::Media(MediaError::Cancelled(_))
                | Self::Vision(VisionError::Cancelled(_))
        )
    }

    /// Short message suitable for the host's error callback.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthMissing => "Credential not set".to_string(),
            Self::Vision(VisionError::AuthInvalid) => "Invalid credential".to_string(),
            Self::Media(MediaError::MetadataUnavailable(_)) => "Cannot read video".to_string(),
            Self::Media(MediaError::SeekFailed { timestamp }) => {
                format!("Seek failed at {timestamp:.2}s")
            }
            Self::Media(MediaError::FfmpegNotFound)
            | Self::Media(MediaError::FfprobeNotFound) => "Toolchain load failed".to_string(),
            Self::Media(e @ MediaError::FfmpegFailed { .. }) => e
                .stderr_tail()
                .filter(|tail| !tail.is_empty())
                .map(|tail| tail.to_string())
                .unwrap_or_else(|| e.to_string()),
            Self::NoFrames => "No frames extractable".to_string(),
            Self::AllAnalysesFailed(first) => first.clone(),
            Self::NoHighlights => "No highlights detected".to_string(),
            other => other.to_string(),
        }
    }
}
