//! Highlight reel pipeline.
//!
//! Drives sampling, analysis, creative direction, and assembly as a
//! cancellable state machine, fanning progress into four weighted bands and
//! aggregating final statistics.

pub mod callbacks;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod stages;
pub mod stats;

pub use callbacks::PipelineCallbacks;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use orchestrator::{PipelineOrchestrator, PipelinePhase};
pub use stages::{FrameAnalyzer, FrameSource, ReelAssembler};
pub use stats::PipelineStats;
