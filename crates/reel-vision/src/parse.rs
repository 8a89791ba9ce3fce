//! Robust JSON extraction from model responses.
//!
//! Models are asked for bare JSON but routinely wrap it in markdown fences or
//! prose. Parsing is attempted in three steps: the whole body, a stripped
//! ```json fence, then the first `{...}` span. When everything fails the frame
//! gets a conservative degraded analysis rather than an error; an unparseable
//! body is not a transport failure.

use std::sync::OnceLock;

use regex::Regex;
use reel_models::{FrameAnalysis, RawFrameAnalysis};
use tracing::debug;

/// Parse a model response into a frame analysis.
pub fn parse_analysis(text: &str, timestamp: f64, model: &str) -> FrameAnalysis {
    if let Some(raw) = try_parse(text) {
        return raw.into_analysis(timestamp, model);
    }

    let stripped = strip_fence(text);
    if let Some(raw) = try_parse(stripped) {
        return raw.into_analysis(timestamp, model);
    }

    if let Some(span) = json_object_re().find(text) {
        if let Some(raw) = try_parse(span.as_str()) {
            return raw.into_analysis(timestamp, model);
        }
    }

    debug!(model, timestamp, "response had no parseable JSON, degrading");
    FrameAnalysis::degraded(timestamp, model)
}

fn try_parse(text: &str) -> Option<RawFrameAnalysis> {
    serde_json::from_str(text.trim()).ok()
}

/// Strip a leading ```json fence and trailing ``` if present.
fn strip_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

fn json_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex"))
}
