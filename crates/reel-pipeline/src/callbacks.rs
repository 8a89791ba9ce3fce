//! Host observer callbacks.

use std::sync::Arc;

use reel_media::MediaBlob;
use reel_models::ProgressEvent;

use crate::stats::PipelineStats;

pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;
pub type LogCallback = Arc<dyn Fn(&str) + Send + Sync>;
pub type CompleteCallback = Arc<dyn Fn(&MediaBlob, &PipelineStats) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Optional callback quartet the host can register on a run.
#[derive(Clone, Default)]
pub struct PipelineCallbacks {
    pub on_progress: Option<ProgressCallback>,
    pub on_log: Option<LogCallback>,
    pub on_complete: Option<CompleteCallback>,
    pub on_error: Option<ErrorCallback>,
}

impl PipelineCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_progress(mut self, callback: impl Fn(ProgressEvent) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub fn on_log(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_log = Some(Arc::new(callback));
        self
    }

    pub fn on_complete(
        mut self,
        callback: impl Fn(&MediaBlob, &PipelineStats) + Send + Sync + 'static,
    ) -> Self {
        self.on_complete = Some(Arc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

impl std::fmt::Debug for PipelineCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineCallbacks")
            .field("on_progress", &self.on_progress.is_some())
            .field("on_log", &self.on_log.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
