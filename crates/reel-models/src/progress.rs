//! Unified progress event schema.
//!
//! Components report their own stage-local progress; the orchestrator
//! projects it into this schema before handing it to host callbacks.

use serde::{Deserialize, Serialize};

/// Pipeline stage labels as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageLabel {
    FrameExtraction,
    AiAnalysis,
    ClipDetection,
    VideoGeneration,
    Completed,
}

impl StageLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FrameExtraction => "frame_extraction",
            Self::AiAnalysis => "ai_analysis",
            Self::ClipDetection => "clip_detection",
            Self::VideoGeneration => "video_generation",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for StageLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressKind {
    Progress,
    Error,
    Completion,
}

/// Event emitted to the host's `on_progress` callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub kind: ProgressKind,

    pub stage: StageLabel,

    /// Overall pipeline progress, 0-100.
    pub progress: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressEvent {
    pub fn progress(stage: StageLabel, percent: u8) -> Self {
        Self {
            kind: ProgressKind::Progress,
            stage,
            progress: percent.min(100),
            message: None,
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn error(stage: StageLabel, error: impl Into<String>) -> Self {
        Self {
            kind: ProgressKind::Error,
            stage,
            progress: 0,
            message: None,
            error: Some(error.into()),
        }
    }

    pub fn completion() -> Self {
        Self {
            kind: ProgressKind::Completion,
            stage: StageLabel::Completed,
            progress: 100,
            message: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_labels() {
        assert_eq!(StageLabel::FrameExtraction.as_str(), "frame_extraction");
        assert_eq!(StageLabel::AiAnalysis.as_str(), "ai_analysis");
        assert_eq!(StageLabel::ClipDetection.as_str(), "clip_detection");
        assert_eq!(StageLabel::VideoGeneration.as_str(), "video_generation");
        assert_eq!(StageLabel::Completed.as_str(), "completed");
    }

    #[test]
    fn test_wire_format() {
        let event = ProgressEvent::progress(StageLabel::AiAnalysis, 42).with_message("frame 3/10");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["stage"], "ai_analysis");
        assert_eq!(json["progress"], 42);
        assert_eq!(json["message"], "frame 3/10");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_progress_caps_at_100() {
        assert_eq!(ProgressEvent::progress(StageLabel::Completed, 150).progress, 100);
    }
}
