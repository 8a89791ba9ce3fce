//! Pipeline configuration.

use reel_director::DirectorConfig;
use reel_media::SamplerConfig;
use reel_vision::VisionConfig;

/// Full pipeline configuration.
///
/// The credential is an opaque string owned by the host; it is handed to the
/// vision transport and never logged.
#[derive(Clone)]
pub struct PipelineConfig {
    pub api_key: String,
    pub sampler: SamplerConfig,
    pub vision: VisionConfig,
    pub director: DirectorConfig,
}

impl PipelineConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            sampler: SamplerConfig::default(),
            vision: VisionConfig::default(),
            director: DirectorConfig::default(),
        }
    }

    /// Create config from environment variables, with the given credential.
    pub fn from_env(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            sampler: SamplerConfig::from_env(),
            vision: VisionConfig::from_env(),
            director: DirectorConfig::from_env(),
        }
    }
}

// The credential must never reach logs.
impl std::fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("api_key", &"<redacted>")
            .field("sampler", &self.sampler)
            .field("vision", &self.vision)
            .field("director", &self.director)
            .finish()
    }
}
