//! Detected gameplay events.
//!
//! Intermediate facts the director extracts from frame analyses before
//! proposing clips.

use serde::{Deserialize, Serialize};

use crate::analysis::ActionIntensity;

/// Multi-kill classification by kill count within the detection window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiEventKind {
    Double,
    Triple,
    Quad,
    Ace,
}

impl MultiEventKind {
    /// Classify a kill count. Fewer than two kills is not a multi-kill.
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            0 | 1 => None,
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            4 => Some(Self::Quad),
            _ => Some(Self::Ace),
        }
    }

    /// Display label for overlays and clip names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Double => "DOUBLE KILL",
            Self::Triple => "TRIPLE KILL",
            Self::Quad => "QUAD KILL",
            Self::Ace => "ACE",
        }
    }
}

/// A run of rapid successive kills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiEvent {
    pub kind: MultiEventKind,
    /// Start of the detection window (first kill).
    pub timestamp: f64,
    pub kill_count: usize,
    /// Last kill inside the window.
    pub end_timestamp: f64,
}

/// A frame observed in a clutch state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClutchMoment {
    pub timestamp: f64,
    pub action_intensity: ActionIntensity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftDirection {
    Up,
    Down,
}

/// A sustained change in the excitement moving average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumShift {
    pub timestamp: f64,
    pub direction: ShiftDirection,
    pub magnitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_event_classification() {
        assert_eq!(MultiEventKind::from_count(2), Some(MultiEventKind::Double));
        assert_eq!(MultiEventKind::from_count(3), Some(MultiEventKind::Triple));
        assert_eq!(MultiEventKind::from_count(4), Some(MultiEventKind::Quad));
        assert_eq!(MultiEventKind::from_count(5), Some(MultiEventKind::Ace));
        assert_eq!(MultiEventKind::from_count(9), Some(MultiEventKind::Ace));
    }

    #[test]
    fn test_single_kill_is_not_a_multi_event() {
        assert_eq!(MultiEventKind::from_count(0), None);
        assert_eq!(MultiEventKind::from_count(1), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(MultiEventKind::Triple.label(), "TRIPLE KILL");
        assert_eq!(MultiEventKind::Ace.label(), "ACE");
    }
}
