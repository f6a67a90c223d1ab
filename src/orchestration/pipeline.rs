// Scan pipeline: capture -> optimize -> request, one run at a time

use anyhow::Result;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

use crate::core::config::Config;
use crate::core::errors::PipelineResult;
use crate::core::types::{PipelineState, RunOutcome};
use crate::services::capture::ImageCapturer;
use crate::services::optimizer::ImageOptimizer;
use crate::services::settings::Settings;
use crate::services::translation::{ApiClient, ModelOptions, TranslationRequester};
use crate::utils::Metrics;

pub struct ScanPipeline {
    capturer: Arc<dyn ImageCapturer>,
    optimizer: ImageOptimizer,
    requester: TranslationRequester,
    in_flight: AtomicBool,
    state: Mutex<PipelineState>,
    last_terminal: Mutex<Option<PipelineState>>,
    metrics: Option<Metrics>,
}

/// Clears the in-flight flag and returns to Idle on every exit path
struct RunGuard<'a> {
    pipeline: &'a ScanPipeline,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.pipeline.transition(PipelineState::Idle);
        self.pipeline.in_flight.store(false, Ordering::Release);
    }
}

impl ScanPipeline {
    pub fn new(
        capturer: Arc<dyn ImageCapturer>,
        optimizer: ImageOptimizer,
        requester: TranslationRequester,
    ) -> Self {
        Self {
            capturer,
            optimizer,
            requester,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(PipelineState::Idle),
            last_terminal: Mutex::new(None),
            metrics: None,
        }
    }

    /// Wire the production services from configuration.
    pub fn from_config(
        config: &Config,
        capturer: Arc<dyn ImageCapturer>,
        settings: Settings,
        metrics: Metrics,
    ) -> Result<Self> {
        let backend = Arc::new(ApiClient::new(&config.api, Some(metrics.clone()))?);
        let optimizer =
            ImageOptimizer::new(config.compression.clone()).with_metrics(metrics.clone());
        let requester =
            TranslationRequester::new(settings, backend, ModelOptions::from(&config.api));

        Ok(Self::new(capturer, optimizer, requester).with_metrics(metrics))
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn state(&self) -> PipelineState {
        *self.state.lock()
    }

    /// Done or Failed for the most recent finished run
    pub fn last_terminal_state(&self) -> Option<PipelineState> {
        *self.last_terminal.lock()
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one capture-to-reply chain.
    ///
    /// Returns `AlreadyRunning` without touching any stage if a run is in
    /// flight. Any stage failure aborts the run; nothing is retried.
    #[instrument(skip(self))]
    pub async fn run(&self) -> PipelineResult<RunOutcome> {
        let Some(_guard) = self.try_begin() else {
            info!("Scan already in progress, ignoring request");
            if let Some(ref m) = self.metrics {
                m.record_run_rejected();
            }
            return Ok(RunOutcome::AlreadyRunning);
        };

        let start = Instant::now();
        let result = self.run_stages().await;

        let terminal = if result.is_ok() {
            PipelineState::Done
        } else {
            PipelineState::Failed
        };
        self.transition(terminal);
        *self.last_terminal.lock() = Some(terminal);

        if let Some(ref m) = self.metrics {
            m.record_run(result.is_ok(), start.elapsed());
        }

        match result {
            Ok(raw_reply) => {
                info!("Scan completed in {:?}", start.elapsed());
                Ok(RunOutcome::Completed { raw_reply })
            }
            Err(e) => {
                error!("Failed to process image: {}", e);
                Err(e)
            }
        }
    }

    async fn run_stages(&self) -> PipelineResult<String> {
        self.transition(PipelineState::Capturing);
        let capture = self.capturer.capture().await?;

        self.transition(PipelineState::Optimizing);
        let image = self.optimizer.optimize(&capture).await?;

        self.transition(PipelineState::Requesting);
        let reply = self.requester.request(&image).await?;

        Ok(reply)
    }

    fn try_begin(&self) -> Option<RunGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard { pipeline: self })
    }

    fn transition(&self, next: PipelineState) {
        let mut state = self.state.lock();
        debug!("Pipeline {} -> {}", *state, next);
        *state = next;
    }
}
