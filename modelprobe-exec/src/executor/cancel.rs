use std::sync::OnceLock;

use modelprobe_core::CancelReason;
use tokio::sync::Notify;

/// Write-once stop flag shared by every task of a run. The first reason
/// set wins; a run is never un-cancelled.
#[derive(Debug, Default)]
pub struct CancellationSignal {
    reason: OnceLock<CancelReason>,
    notify: Notify,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the signal. Returns false if it was already tripped.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        let first = self.reason.set(reason).is_ok();
        if first {
            self.notify.notify_waiters();
        }
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.reason.get().is_some()
    }

    pub fn reason(&self) -> Option<CancelReason> {
        self.reason.get().copied()
    }

    /// Resolves once the signal is tripped.
    pub async fn cancelled(&self) {
        loop {
            let mut notified = std::pin::pin!(self.notify.notified());
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
