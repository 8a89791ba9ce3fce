//! Director error types.

use reel_models::TimeRangeError;
use thiserror::Error;

pub type DirectorResult<T> = Result<T, DirectorError>;

#[derive(Debug, Error)]
pub enum DirectorError {
    #[error("invalid clip interval: {0}")]
    Range(#[from] TimeRangeError),
}
