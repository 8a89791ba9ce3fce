//! Vision client error types.

use reel_models::Cancelled;
use thiserror::Error;

pub type VisionResult<T> = Result<T, VisionError>;

#[derive(Debug, Error)]
pub enum VisionError {
    /// Credential rejected by the API. Non-retryable, non-rotating.
    #[error("vision API rejected the credential")]
    AuthInvalid,

    #[error("model list is empty")]
    EmptyModelList,

    /// Retry budget spent across the whole fallback list.
    #[error("frame at {timestamp:.2}s failed after {attempts} attempts: {last_error}")]
    Exhausted {
        timestamp: f64,
        attempts: usize,
        last_error: String,
    },

    #[error("operation cancelled")]
    Cancelled(#[from] Cancelled),

    #[error("internal error: {0}")]
    Internal(String),
}

impl VisionError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error must abort the whole batch rather than degrade
    /// a single frame to a sentinel.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AuthInvalid | Self::Cancelled(_))
    }
}
