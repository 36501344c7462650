use std::sync::Arc;

use chrono::Local;
use modelprobe_core::{
    AttemptOutcome, AttemptResult, ErrorClassifier, TargetSpec, TaskPhase, TransportFailureKind,
};
use tokio::time::Instant;
use uuid::Uuid;

use crate::executor::cancel::CancellationSignal;
use crate::executor::events::{Event, EventSink};
use crate::executor::request::build_request;
use crate::executor::status::{RunProgress, StatusBoard};
use crate::http::{HttpClient, MAX_RESPONSE_BYTES};
use crate::retry::{decide_retry, RetryConfig, RetryDecision};

/// Runs the retry loop of one target and produces its single result.
pub struct AttemptExecutor {
    run_id: Uuid,
    http: Arc<dyn HttpClient>,
    classifier: Arc<dyn ErrorClassifier>,
    retry: RetryConfig,
    signal: Arc<CancellationSignal>,
    board: Arc<StatusBoard>,
    progress: Arc<RunProgress>,
    events: Arc<dyn EventSink>,
}

/// Clears the board entry and counts the task as completed when the task
/// ends, however it ends.
struct SlotGuard<'a> {
    board: &'a StatusBoard,
    progress: &'a RunProgress,
    slot: usize,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.board.remove(self.slot);
        self.progress.complete_one();
    }
}

impl AttemptExecutor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        run_id: Uuid,
        http: Arc<dyn HttpClient>,
        classifier: Arc<dyn ErrorClassifier>,
        retry: RetryConfig,
        signal: Arc<CancellationSignal>,
        board: Arc<StatusBoard>,
        progress: Arc<RunProgress>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            run_id,
            http,
            classifier,
            retry,
            signal,
            board,
            progress,
            events,
        }
    }

    pub async fn execute(&self, slot: usize, spec: &TargetSpec) -> AttemptResult {
        let mut result = AttemptResult::new(
            &spec.target_id,
            &spec.provider_name,
            spec.category.clone(),
            Local::now(),
        );
        self.board.begin(slot, &spec.target_id);
        let _guard = SlotGuard {
            board: &self.board,
            progress: &self.progress,
            slot,
        };

        match build_request(spec) {
            Ok(request) => self.run_attempts(slot, spec, request, &mut result).await,
            Err(e) => {
                let message = format!("failed to encode request body: {e}");
                let class = self
                    .classifier
                    .classify_transport(TransportFailureKind::Other, &message);
                result.record_transport_error(class, message);
            }
        }

        tracing::debug!(
            target_id = %spec.target_id,
            status = %result.status,
            retries = result.retries_used,
            "target finished"
        );
        self.events
            .emit(Event::TargetFinished {
                run_id: self.run_id,
                target_id: spec.target_id.clone(),
                status: result.status.to_string(),
            })
            .await;
        result
    }

    async fn run_attempts(
        &self,
        slot: usize,
        spec: &TargetSpec,
        request: crate::http::HttpRequestParts,
        result: &mut AttemptResult,
    ) {
        let mut attempt_no: u32 = 0;
        loop {
            if let Some(reason) = self.signal.reason() {
                result.record_cancelled(reason);
                return;
            }

            attempt_no += 1;
            let retries = attempt_no - 1;
            result.retries_used = retries;
            self.board.update(slot, |s| {
                s.phase = if retries == 0 {
                    TaskPhase::Running
                } else {
                    TaskPhase::Retry(retries)
                };
                s.retry_count = retries;
            });
            self.events
                .emit(Event::AttemptStarted {
                    run_id: self.run_id,
                    target_id: spec.target_id.clone(),
                    attempt_no,
                })
                .await;

            let started = Instant::now();
            let sent = self
                .http
                .send(request.clone(), spec.request_timeout, MAX_RESPONSE_BYTES)
                .await;
            let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            self.board.update(slot, |s| s.latency_ms = latency_ms);

            let outcome = match sent {
                Ok(resp) => AttemptOutcome::from_response(resp.status, resp.body_text()),
                Err(e) => AttemptOutcome::TransportError {
                    kind: e.kind(),
                    message: e.to_string(),
                },
            };
            tracing::debug!(
                target_id = %spec.target_id,
                attempt_no,
                latency_ms,
                success = outcome.is_success(),
                "attempt finished"
            );
            self.events
                .emit(Event::AttemptFinished {
                    run_id: self.run_id,
                    target_id: spec.target_id.clone(),
                    attempt_no,
                    http_status: match &outcome {
                        AttemptOutcome::Success { status, .. }
                        | AttemptOutcome::ProtocolError { status, .. } => Some(*status),
                        AttemptOutcome::TransportError { .. } => None,
                    },
                    latency_ms,
                    succeeded: outcome.is_success(),
                })
                .await;

            self.record(&outcome, latency_ms, result);

            match decide_retry(&self.retry, attempt_no, &outcome, || fastrand::u64(..)) {
                RetryDecision::Stop { .. } => return,
                RetryDecision::RetryAfter { delay, reason } => {
                    let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                    tracing::debug!(
                        target_id = %spec.target_id,
                        delay_ms,
                        ?reason,
                        "retry scheduled"
                    );
                    self.events
                        .emit(Event::RetryScheduled {
                            run_id: self.run_id,
                            target_id: spec.target_id.clone(),
                            delay_ms,
                        })
                        .await;
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = self.signal.cancelled() => {}
                    }
                }
            }
        }
    }

    fn record(&self, outcome: &AttemptOutcome, latency_ms: u64, result: &mut AttemptResult) {
        match outcome {
            AttemptOutcome::Success { body, .. } => result.record_success(latency_ms, body.clone()),
            AttemptOutcome::ProtocolError { status, body } => {
                let class = self.classifier.classify_http(*status, body);
                result.record_http_error(*status, class, body.clone());
                result.latency_ms = latency_ms;
            }
            AttemptOutcome::TransportError { kind, message } => {
                let class = self.classifier.classify_transport(*kind, message);
                result.record_transport_error(class, message.clone());
                result.latency_ms = latency_ms;
            }
        }
    }
}
