//! Creative direction for highlight reels.
//!
//! Consumes frame analyses and emits an ordered list of clip intervals plus
//! an optional hook intro. Three cooperating services:
//! 1. `HighlightDetector` - finds the best moments
//! 2. `CompositionPlanner` - plans pacing and structure
//! 3. `ClipScorer` - predicts engagement
//!
//! Everything here is pure and deterministic: the same analyses always
//! produce the same decisions.

pub mod composition;
pub mod config;
pub mod decisions;
pub mod director;
pub mod error;
pub mod highlight;
pub mod scoring;
pub mod stats;

pub use composition::CompositionPlanner;
pub use config::DirectorConfig;
pub use decisions::{DirectorDecisions, EngagementCurve, EngagementSummary, VarietyAnalysis, VarietyIssue};
pub use director::CreativeDirector;
pub use error::{DirectorError, DirectorResult};
pub use highlight::HighlightDetector;
pub use scoring::ClipScorer;
