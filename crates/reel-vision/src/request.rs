//! Vision API request/response shapes.

use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};

/// Instruction sent with every frame.
pub const VISION_PROMPT: &str = r#"You are analyzing a single frame from a gameplay video.
Return ONLY a single JSON object with this schema and nothing else:
{
  "kill_log": false,
  "kill_count": 0,
  "match_status": "normal | clutch | victory | defeat | overtime | unknown",
  "action_intensity": "very_high | high | medium | low",
  "enemy_visible": false,
  "enemy_count": 0,
  "visual_quality": "cinematic | high | normal | low",
  "scene_description": "one short sentence",
  "ui_elements": "comma-separated HUD elements you can see",
  "confidence": 0.0
}

Rules:
- "kill_log" is true only when a kill feed entry is visible on screen.
- "kill_count" counts entries currently visible in the kill feed.
- "confidence" is your certainty in [0, 1].
- Use the fallback value ("unknown", "low", "normal") when you cannot tell.
- Do not wrap the JSON in markdown fences or add commentary."#;

/// Upper bound on the completion; analyses are small JSON objects.
const MAX_TOKENS: u32 = 500;

/// Encode frame bytes for inline transport.
pub fn encode_image(image: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(image)
}

/// Build the chat-completions request body for one frame.
pub fn build_request(model: &str, image_base64: &str) -> Value {
    json!({
        "model": model,
        "max_tokens": MAX_TOKENS,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": VISION_PROMPT },
                {
                    "type": "image_url",
                    "image_url": { "url": format!("data:image/jpeg;base64,{image_base64}") }
                }
            ]
        }]
    })
}

/// Chat-completions response envelope.
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pull the assistant text out of a 2xx response body, if any.
pub fn extract_content(body: &str) -> Option<String> {
    let completion: ChatCompletion = serde_json::from_str(body).ok()?;
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_shape() {
        let body = build_request("test-model", "QUJD");
        assert_eq!(body["model"], "test-model");
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/jpeg;base64,QUJD"
        );
    }

    #[test]
    fn test_encode_image() {
        assert_eq!(encode_image(b"ABC"), "QUJD");
    }

    #[test]
    fn test_extract_content() {
        let body = r#"{"choices":[{"message":{"content":"  {\"kill_log\": true}  "}}]}"#;
        assert_eq!(extract_content(body).unwrap(), r#"{"kill_log": true}"#);
    }

    #[test]
    fn test_extract_content_empty_or_missing() {
        assert_eq!(extract_content(r#"{"choices":[]}"#), None);
        assert_eq!(
            extract_content(r#"{"choices":[{"message":{"content":"   "}}]}"#),
            None
        );
        assert_eq!(
            extract_content(r#"{"choices":[{"message":{}}]}"#),
            None
        );
        assert_eq!(extract_content("not json"), None);
    }
}
