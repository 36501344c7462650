use std::sync::Arc;

use chrono::Local;
use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use modelprobe_core::{
    AttemptResult, ErrorClassifier, RunConfig, TargetSpec, TransportFailureKind,
};
use tokio::task::JoinError;
use tokio::time::Instant;
use uuid::Uuid;

use crate::executor::attempt::AttemptExecutor;
use crate::executor::cancel::CancellationSignal;
use crate::executor::concurrency::WorkerLimit;
use crate::executor::deadline::DeadlineGuard;
use crate::executor::events::{Event, EventSink};
use crate::executor::monitor::{StatusMonitor, StatusRenderer};
use crate::executor::result::{ExecutionError, RunOutcome};
use crate::executor::status::{RunProgress, StatusBoard};
use crate::http::HttpClient;
use crate::retry::RetryConfig;

/// Identity of a submitted target, kept so a crashed task still yields a row.
struct Submitted {
    target_id: String,
    provider_name: String,
    category: Option<String>,
}

type Joined = (Submitted, Result<AttemptResult, JoinError>);

pub struct Executor {
    config: RunConfig,
    retry: RetryConfig,
    http: Arc<dyn HttpClient>,
    classifier: Arc<dyn ErrorClassifier>,
    event_sink: Arc<dyn EventSink>,
    renderer: Option<Arc<dyn StatusRenderer>>,
}

impl Executor {
    pub fn new(
        config: RunConfig,
        http: Arc<dyn HttpClient>,
        classifier: Arc<dyn ErrorClassifier>,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        let retry = RetryConfig::from_run_config(&config);
        Self {
            config,
            retry,
            http,
            classifier,
            event_sink,
            renderer: None,
        }
    }

    /// Renders live status through `renderer` while a run is in progress.
    pub fn with_renderer(mut self, renderer: Arc<dyn StatusRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_retry_jitter(mut self, jitter: bool) -> Self {
        self.retry.jitter = jitter;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub async fn execute_run(&self, targets: Vec<TargetSpec>) -> Result<RunOutcome, ExecutionError> {
        self.execute_run_with_signal(targets, Arc::new(CancellationSignal::new()))
            .await
    }

    /// Runs every target to completion or cancellation. `signal` may be
    /// tripped from outside to stop the run early.
    pub async fn execute_run_with_signal(
        &self,
        targets: Vec<TargetSpec>,
        signal: Arc<CancellationSignal>,
    ) -> Result<RunOutcome, ExecutionError> {
        self.config.validate()?;
        let run_id = Uuid::new_v4();
        if targets.is_empty() {
            tracing::debug!(%run_id, "no targets to run");
            return Ok(RunOutcome::empty(run_id));
        }

        let started = Instant::now();
        let total = targets.len();
        let workers = self.config.effective_workers(total);
        let board = Arc::new(StatusBoard::new());
        let progress = Arc::new(RunProgress::new(total));

        self.event_sink
            .emit(Event::RunStarted {
                run_id,
                total,
                workers,
            })
            .await;
        tracing::debug!(%run_id, total, workers, "run started");

        let guard = DeadlineGuard::arm(
            self.config.global_timeout,
            signal.clone(),
            self.event_sink.clone(),
            run_id,
        );
        let monitor = self.renderer.clone().map(|renderer| {
            StatusMonitor::start(
                self.config.status_refresh_interval,
                self.config.max_workers,
                board.clone(),
                progress.clone(),
                renderer,
            )
        });

        let attempt = Arc::new(AttemptExecutor::new(
            run_id,
            self.http.clone(),
            self.classifier.clone(),
            self.retry.clone(),
            signal.clone(),
            board,
            progress.clone(),
            self.event_sink.clone(),
        ));
        let limit = WorkerLimit::new(workers);
        let mut results = Vec::with_capacity(total);
        let mut pending: FuturesUnordered<BoxFuture<'static, Joined>> = FuturesUnordered::new();

        for (slot, spec) in targets.into_iter().enumerate() {
            let permit = loop {
                tokio::select! {
                    permit = limit.acquire() => break permit?,
                    Some((submitted, joined)) = pending.next(), if !pending.is_empty() => {
                        results.push(self.collect(submitted, joined));
                    }
                }
            };

            let submitted = Submitted {
                target_id: spec.target_id.clone(),
                provider_name: spec.provider_name.clone(),
                category: spec.category.clone(),
            };
            let attempt = attempt.clone();
            let handle = tokio::spawn(async move {
                let result = attempt.execute(slot, &spec).await;
                drop(permit);
                result
            });
            pending.push(Box::pin(async move { (submitted, handle.await) }));
        }

        while let Some((submitted, joined)) = pending.next().await {
            results.push(self.collect(submitted, joined));
        }

        guard.disarm();
        if let Some(monitor) = monitor {
            monitor.stop().await;
        }

        let cancelled = signal.reason();
        let completed = progress.completed();
        self.event_sink
            .emit(Event::RunFinished {
                run_id,
                completed,
                cancelled,
            })
            .await;
        tracing::debug!(%run_id, completed, ?cancelled, "run finished");

        Ok(RunOutcome {
            run_id,
            results,
            completed,
            total,
            cancelled,
            elapsed: started.elapsed(),
        })
    }

    fn collect(
        &self,
        submitted: Submitted,
        joined: Result<AttemptResult, JoinError>,
    ) -> AttemptResult {
        match joined {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(target_id = %submitted.target_id, error = %e, "target task failed");
                let message = format!("task failed: {e}");
                let class = self
                    .classifier
                    .classify_transport(TransportFailureKind::Other, &message);
                let mut result = AttemptResult::new(
                    submitted.target_id,
                    submitted.provider_name,
                    submitted.category,
                    Local::now(),
                );
                result.record_transport_error(class, message);
                result
            }
        }
    }
}
