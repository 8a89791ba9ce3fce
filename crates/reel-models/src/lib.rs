//! Shared data models for the highlight reel pipeline.
//!
//! This crate provides the types passed between pipeline stages:
//! - Time ranges and quality scores
//! - Frame analyses (canonical + raw vendor schema)
//! - Clips and detected events
//! - Progress event schema
//! - The run-wide cancellation token

pub mod analysis;
pub mod cancel;
pub mod clip;
pub mod events;
pub mod frame;
pub mod progress;
pub mod quality_score;
pub mod time_range;

// Re-export common types
pub use analysis::{ActionIntensity, FrameAnalysis, MatchStatus, RawFrameAnalysis, VisualQuality};
pub use cancel::{CancelToken, Cancelled};
pub use clip::{Clip, ClipType};
pub use frame::Frame;
pub use events::{ClutchMoment, MomentumShift, MultiEvent, MultiEventKind, ShiftDirection};
pub use progress::{ProgressEvent, ProgressKind, StageLabel};
pub use quality_score::QualityScore;
pub use time_range::{TimeRange, TimeRangeError};
