//! Vision request scheduler.
//!
//! A single cooperative loop drives every frame request: at most
//! `concurrency` in flight, a global monotonic clock spacing request starts,
//! and a per-frame rotation state machine over the model fallback list.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reel_models::{CancelToken, Cancelled, Frame, FrameAnalysis};
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::VisionConfig;
use crate::error::{VisionError, VisionResult};
use crate::parse::parse_analysis;
use crate::request::{build_request, encode_image, extract_content};
use crate::transport::{HttpTransport, VisionTransport};

/// Progress of a batch analysis, 0-100 within this stage.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

/// Multi-model vision API client.
pub struct VisionClient {
    config: VisionConfig,
    transport: Arc<dyn VisionTransport>,
    slots: Semaphore,
    /// Start time of the most recent request, for global pacing.
    last_start: Mutex<Option<Instant>>,
}

impl VisionClient {
    /// Create a client over an arbitrary transport.
    pub fn new(config: VisionConfig, transport: Arc<dyn VisionTransport>) -> VisionResult<Self> {
        if config.models.is_empty() {
            return Err(VisionError::EmptyModelList);
        }
        let slots = Semaphore::new(config.concurrency.max(1));
        Ok(Self {
            config,
            transport,
            slots,
            last_start: Mutex::new(None),
        })
    }

    /// Create a client talking to the configured HTTP endpoint.
    pub fn with_http(config: VisionConfig, api_key: impl Into<String>) -> VisionResult<Self> {
        let transport = Arc::new(HttpTransport::new(config.endpoint.clone(), api_key));
        Self::new(config, transport)
    }

    /// Analyze one frame, rotating across the model list as needed.
    pub async fn analyze(
        &self,
        frame: &Frame,
        cancel: &CancelToken,
    ) -> VisionResult<FrameAnalysis> {
        // Queue admission
        cancel.check()?;
        let _permit = self
            .slots
            .acquire()
            .await
            .map_err(|_| VisionError::internal("scheduler closed"))?;
        cancel.check()?;

        let (text, model) = self.request_with_rotation(frame, cancel).await?;
        Ok(parse_analysis(&text, frame.timestamp, &model))
    }

    /// Analyze a batch of frames.
    ///
    /// The result has the same length and order as the input. A frame whose
    /// retry budget is spent becomes a sentinel analysis carrying the error;
    /// only credential rejection and cancellation abort the whole batch.
    pub async fn analyze_batch<F>(
        &self,
        frames: &[Frame],
        on_progress: F,
        cancel: &CancelToken,
    ) -> VisionResult<Vec<FrameAnalysis>>
    where
        F: Fn(BatchProgress) + Send + Sync,
    {
        let total = frames.len();
        info!("Analyzing {} frames across {} models", total, self.config.models.len());
        let completed = AtomicUsize::new(0);

        let tasks = frames.iter().map(|frame| {
            let completed = &completed;
            let on_progress = &on_progress;
            async move {
                let result = self.analyze(frame, cancel).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                on_progress(BatchProgress {
                    completed: done,
                    total,
                    percent: ((done as f64 / total.max(1) as f64) * 100.0).round() as u8,
                });
                result
            }
        });

        // join_all returns results in input order regardless of completion order
        let results = futures::future::join_all(tasks).await;

        let mut analyses = Vec::with_capacity(total);
        for (frame, result) in frames.iter().zip(results) {
            match result {
                Ok(analysis) => analyses.push(analysis),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Frame at {:.2}s failed, recording sentinel: {}", frame.timestamp, e);
                    analyses.push(FrameAnalysis::failed(frame.timestamp, e.to_string()));
                }
            }
        }
        Ok(analyses)
    }

    /// Drive one frame through the rotation state machine.
    ///
    /// Returns the raw response text and the model that produced it.
    async fn request_with_rotation(
        &self,
        frame: &Frame,
        cancel: &CancelToken,
    ) -> VisionResult<(String, String)> {
        let models = &self.config.models;
        let budget = self.config.max_retries.max(1) * models.len();
        let image_base64 = encode_image(&frame.image);

        let mut model_idx = 0;
        let mut models_tried_in_round = 0;
        let mut attempt = 0;
        let mut last_error = String::from("no attempts made");

        while attempt < budget {
            cancel.check()?;

            let model = &models[model_idx];
            let body = build_request(model, &image_base64);

            self.pace(cancel).await?;
            let outcome = tokio::time::timeout(
                self.config.cold_start_timeout,
                self.transport.send(model, &body),
            )
            .await;

            match outcome {
                // Deadline elapsed: rotate and move on
                Err(_) => {
                    warn!("Request to {} timed out, rotating model", model);
                    last_error = format!("request to {model} timed out");
                    model_idx = (model_idx + 1) % models.len();
                    attempt += 1;
                }
                // Connection-level failure: exponential backoff, same model
                Ok(Err(e)) => {
                    warn!("Transport error from {}: {}", model, e);
                    last_error = e.to_string();
                    self.backoff(attempt, cancel).await?;
                    attempt += 1;
                }
                Ok(Ok(reply)) => match reply.status {
                    401 => return Err(VisionError::AuthInvalid),
                    429 => {
                        debug!("{} rate limited", model);
                        last_error = format!("{model} rate limited");
                        models_tried_in_round += 1;
                        model_idx = (model_idx + 1) % models.len();
                        if models_tried_in_round >= models.len() {
                            info!(
                                "Every model rate limited this round, backing off {:.0}s",
                                self.config.all_models_backoff.as_secs_f64()
                            );
                            cancel.sleep(self.config.all_models_backoff).await?;
                            models_tried_in_round = 0;
                        }
                        attempt += 1;
                    }
                    503 => {
                        info!(
                            "{} is warming up, waiting {:.0}s",
                            model,
                            self.config.cold_start_retry_delay.as_secs_f64()
                        );
                        last_error = format!("{model} warming up");
                        cancel.sleep(self.config.cold_start_retry_delay).await?;
                        attempt += 1;
                    }
                    status if (200..300).contains(&status) => {
                        match extract_content(&reply.body) {
                            Some(content) => {
                                debug!("{} answered for frame at {:.2}s", model, frame.timestamp);
                                return Ok((content, model.clone()));
                            }
                            None => {
                                warn!("{} returned an empty response", model);
                                last_error = format!("{model} returned an empty response");
                                self.backoff(attempt, cancel).await?;
                                attempt += 1;
                            }
                        }
                    }
                    status => {
                        warn!("{} returned status {}", model, status);
                        last_error = format!("{model} returned status {status}");
                        self.backoff(attempt, cancel).await?;
                        attempt += 1;
                    }
                },
            }
        }

        Err(VisionError::Exhausted {
            timestamp: frame.timestamp,
            attempts: budget,
            last_error,
        })
    }

    /// Enforce the global minimum spacing between request starts.
    ///
    /// The lock is held across the wait so concurrent callers serialize their
    /// starts instead of all waking at once.
    async fn pace(&self, cancel: &CancelToken) -> Result<(), Cancelled> {
        let mut last_start = self.last_start.lock().await;
        if let Some(previous) = *last_start {
            let elapsed = previous.elapsed();
            if elapsed < self.config.request_delay {
                cancel.sleep(self.config.request_delay - elapsed).await?;
            }
        }
        *last_start = Some(Instant::now());
        Ok(())
    }

    /// Exponential backoff; the exponent grows once per full pass over the
    /// model list.
    async fn backoff(&self, attempt: usize, cancel: &CancelToken) -> Result<(), Cancelled> {
        let exponent = (attempt / self.config.models.len()) as u32;
        let delay = self
            .config
            .initial_backoff
            .saturating_mul(2u32.saturating_pow(exponent));
        cancel.sleep(delay).await
    }
}
