//! Sampled keyframe.

/// A still image sampled from the source media at a known timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Position in the source video, seconds.
    pub timestamp: f64,
    /// JPEG-encoded image bytes.
    pub image: Vec<u8>,
}

impl Frame {
    pub fn new(timestamp: f64, image: Vec<u8>) -> Self {
        Self { timestamp, image }
    }
}
