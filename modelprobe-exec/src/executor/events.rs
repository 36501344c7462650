use std::sync::Arc;

use async_trait::async_trait;
use modelprobe_core::CancelReason;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        run_id: Uuid,
        total: usize,
        workers: usize,
    },
    RunFinished {
        run_id: Uuid,
        completed: usize,
        cancelled: Option<CancelReason>,
    },
    AttemptStarted {
        run_id: Uuid,
        target_id: String,
        attempt_no: u32,
    },
    AttemptFinished {
        run_id: Uuid,
        target_id: String,
        attempt_no: u32,
        http_status: Option<u16>,
        latency_ms: u64,
        succeeded: bool,
    },
    RetryScheduled {
        run_id: Uuid,
        target_id: String,
        delay_ms: u64,
    },
    TargetFinished {
        run_id: Uuid,
        target_id: String,
        status: String,
    },
    DeadlineReached {
        run_id: Uuid,
        timeout_ms: u64,
    },
}

impl Event {
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::RunStarted { .. } => "run.started",
            Event::RunFinished { .. } => "run.finished",
            Event::AttemptStarted { .. } => "attempt.started",
            Event::AttemptFinished { .. } => "attempt.finished",
            Event::RetryScheduled { .. } => "target.retry_scheduled",
            Event::TargetFinished { .. } => "target.finished",
            Event::DeadlineReached { .. } => "run.deadline_reached",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let ty = self.type_name();
        match self {
            Event::RunStarted { run_id, total, workers } => {
                json!({ "type": ty, "run_id": run_id.to_string(), "total": total, "workers": workers })
            }
            Event::RunFinished { run_id, completed, cancelled } => {
                json!({ "type": ty, "run_id": run_id.to_string(), "completed": completed, "cancelled": cancelled.map(|r| r.as_str()) })
            }
            Event::AttemptStarted { run_id, target_id, attempt_no } => {
                json!({ "type": ty, "run_id": run_id.to_string(), "target_id": target_id, "attempt_no": attempt_no })
            }
            Event::AttemptFinished { run_id, target_id, attempt_no, http_status, latency_ms, succeeded } => {
                json!({ "type": ty, "run_id": run_id.to_string(), "target_id": target_id, "attempt_no": attempt_no, "http_status": http_status, "latency_ms": latency_ms, "succeeded": succeeded })
            }
            Event::RetryScheduled { run_id, target_id, delay_ms } => {
                json!({ "type": ty, "run_id": run_id.to_string(), "target_id": target_id, "delay_ms": delay_ms })
            }
            Event::TargetFinished { run_id, target_id, status } => {
                json!({ "type": ty, "run_id": run_id.to_string(), "target_id": target_id, "status": status })
            }
            Event::DeadlineReached { run_id, timeout_ms } => {
                json!({ "type": ty, "run_id": run_id.to_string(), "timeout_ms": timeout_ms })
            }
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}

/// One JSON object per line on stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        println!("{}", serde_json::to_string(&event.to_json()).unwrap_or_default());
    }
}

/// Forwards events to the `tracing` subscriber at info level.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        tracing::info!(event = event.type_name(), payload = %event.to_json(), "run event");
    }
}

/// Fans each event out to every inner sink, in the order they were given.
pub struct CompositeEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl CompositeEventSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl FromIterator<Arc<dyn EventSink>> for CompositeEventSink {
    fn from_iter<I: IntoIterator<Item = Arc<dyn EventSink>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        let Some((last, rest)) = self.sinks.split_last() else {
            return;
        };
        for sink in rest {
            sink.emit(event.clone()).await;
        }
        last.emit(event).await;
    }
}
