//! Director configuration.

/// Creative direction configuration.
#[derive(Debug, Clone)]
pub struct DirectorConfig {
    /// Minimum clip length, seconds
    pub min_clip_length: f64,
    /// Maximum clip length, seconds
    pub max_clip_length: f64,
    /// Target total reel duration, seconds
    pub target_duration: f64,
    /// Pacing variation in [0, 1]; x10 gives the optimal clip length
    pub pacing_variation: f64,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            min_clip_length: 3.0,
            max_clip_length: 15.0,
            target_duration: 180.0,
            pacing_variation: 0.5,
        }
    }
}

impl DirectorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_clip_length: env_parse("REEL_MIN_CLIP_SECS", defaults.min_clip_length),
            max_clip_length: env_parse("REEL_MAX_CLIP_SECS", defaults.max_clip_length),
            target_duration: env_parse("REEL_TARGET_DURATION_SECS", defaults.target_duration),
            pacing_variation: env_parse("REEL_PACING_VARIATION", defaults.pacing_variation),
        }
    }

    /// Ideal average clip length for pacing scoring.
    pub fn optimal_pace(&self) -> f64 {
        self.pacing_variation * 10.0
    }
}

fn env_parse(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DirectorConfig::default();
        assert_eq!(config.min_clip_length, 3.0);
        assert_eq!(config.max_clip_length, 15.0);
        assert_eq!(config.target_duration, 180.0);
        assert_eq!(config.optimal_pace(), 5.0);
    }
}
