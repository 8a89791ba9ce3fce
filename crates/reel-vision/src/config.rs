//! Vision client configuration.

use std::time::Duration;

/// Default fallback chain, strongest vision model first.
pub const DEFAULT_MODELS: &[&str] = &[
    "Qwen/Qwen2.5-VL-7B-Instruct",
    "meta-llama/Llama-3.2-11B-Vision-Instruct",
    "llava-hf/llava-v1.6-mistral-7b-hf",
];

/// Vision client configuration.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Chat-completions endpoint (vendor-opaque; the model travels in the body)
    pub endpoint: String,
    /// Ordered model fallback list, length >= 1
    pub models: Vec<String>,
    /// Maximum in-flight requests
    pub concurrency: usize,
    /// Minimum spacing between request starts, globally
    pub request_delay: Duration,
    /// Per-request deadline (covers model cold starts)
    pub cold_start_timeout: Duration,
    /// Wait after a "model warming" signal before retrying the same model
    pub cold_start_retry_delay: Duration,
    /// Wait when every model was rate-limited within one round
    pub all_models_backoff: Duration,
    /// Base delay for exponential backoff on other errors
    pub initial_backoff: Duration,
    /// Retries per model; total budget is `max_retries * models.len()`
    pub max_retries: usize,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://router.huggingface.co/v1/chat/completions".to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            concurrency: 1,
            request_delay: Duration::from_millis(2000),
            cold_start_timeout: Duration::from_millis(120_000),
            cold_start_retry_delay: Duration::from_millis(20_000),
            all_models_backoff: Duration::from_millis(60_000),
            initial_backoff: Duration::from_millis(2000),
            max_retries: 3,
        }
    }
}

impl VisionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("REEL_VISION_ENDPOINT").unwrap_or(defaults.endpoint),
            models: std::env::var("REEL_VISION_MODELS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|m| m.trim().to_string())
                        .filter(|m| !m.is_empty())
                        .collect()
                })
                .filter(|models: &Vec<String>| !models.is_empty())
                .unwrap_or(defaults.models),
            concurrency: env_parse("REEL_VISION_CONCURRENCY", defaults.concurrency),
            request_delay: env_millis("REEL_VISION_REQUEST_DELAY_MS", defaults.request_delay),
            cold_start_timeout: env_millis(
                "REEL_VISION_COLD_START_TIMEOUT_MS",
                defaults.cold_start_timeout,
            ),
            cold_start_retry_delay: env_millis(
                "REEL_VISION_COLD_START_RETRY_MS",
                defaults.cold_start_retry_delay,
            ),
            all_models_backoff: env_millis(
                "REEL_VISION_ALL_MODELS_BACKOFF_MS",
                defaults.all_models_backoff,
            ),
            initial_backoff: env_millis("REEL_VISION_INITIAL_BACKOFF_MS", defaults.initial_backoff),
            max_retries: env_parse("REEL_VISION_MAX_RETRIES", defaults.max_retries),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}
