use std::sync::Arc;
use std::time::Duration;

use modelprobe_core::CancelReason;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::executor::cancel::CancellationSignal;
use crate::executor::events::{Event, EventSink};

/// One-shot wall-clock ceiling for a run. Trips the signal with
/// `GlobalTimeout` on expiry; never touches in-flight requests.
pub struct DeadlineGuard {
    handle: Option<JoinHandle<()>>,
}

impl DeadlineGuard {
    pub fn arm(
        timeout: Duration,
        signal: Arc<CancellationSignal>,
        events: Arc<dyn EventSink>,
        run_id: Uuid,
    ) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if signal.cancel(CancelReason::GlobalTimeout) {
                tracing::warn!(
                    timeout_secs = timeout.as_secs_f64(),
                    "global timeout reached, remaining targets will be cancelled"
                );
                events
                    .emit(Event::DeadlineReached {
                        run_id,
                        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    })
                    .await;
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn disarm(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for DeadlineGuard {
    fn drop(&mut self) {
        self.abort();
    }
}
