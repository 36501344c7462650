use std::sync::Arc;
use std::time::Duration;

use modelprobe_core::TaskPhase;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::executor::status::{RunProgress, StatusBoard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTask {
    pub slot: usize,
    pub target_id: String,
    pub phase: TaskPhase,
    pub latency_ms: u64,
    pub retry_count: u32,
    pub running_for: Duration,
}

/// Immutable copy of the run state taken for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub active: Vec<ActiveTask>,
    pub max_workers: usize,
    pub completed: usize,
    pub total: usize,
    pub elapsed: Duration,
}

impl StatusSnapshot {
    pub fn capture(
        board: &StatusBoard,
        progress: &RunProgress,
        max_workers: usize,
        elapsed: Duration,
    ) -> Self {
        let active = board
            .snapshot()
            .into_iter()
            .map(|(slot, status)| ActiveTask {
                slot,
                running_for: status.start_time.elapsed(),
                target_id: status.target_id,
                phase: status.phase,
                latency_ms: status.latency_ms,
                retry_count: status.retry_count,
            })
            .collect();
        Self {
            active,
            max_workers,
            completed: progress.completed(),
            total: progress.total(),
            elapsed,
        }
    }
}

pub trait StatusRenderer: Send + Sync {
    fn render(&self, snapshot: &StatusSnapshot);

    /// Called once after the last render.
    fn finish(&self) {}
}

/// Background task that renders a snapshot every refresh interval.
pub struct StatusMonitor {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl StatusMonitor {
    pub fn start(
        interval: Duration,
        max_workers: usize,
        board: Arc<StatusBoard>,
        progress: Arc<RunProgress>,
        renderer: Arc<dyn StatusRenderer>,
    ) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let snapshot = StatusSnapshot::capture(
                            &board,
                            &progress,
                            max_workers,
                            started.elapsed(),
                        );
                        renderer.render(&snapshot);
                    }
                }
            }
            renderer.finish();
        });
        Self {
            stop_tx: Some(stop_tx),
            handle,
        }
    }

    /// Stops the monitor. No render happens after this returns.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.handle).await {
            tracing::warn!(error = %e, "status monitor task failed");
        }
    }
}

impl Drop for StatusMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// `[█████░░░░░] 50.0% (1/2)`
pub fn progress_bar(completed: usize, total: usize, width: usize) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        (completed as f64 / total as f64).clamp(0.0, 1.0)
    };
    let filled = ((width as f64) * ratio) as usize;
    format!(
        "[{}{}] {:.1}% ({completed}/{total})",
        "█".repeat(filled),
        "░".repeat(width - filled),
        ratio * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(progress_bar(1, 4, 8), "[██░░░░░░] 25.0% (1/4)");
        assert_eq!(progress_bar(0, 0, 4), "[████] 100.0% (0/0)");
        assert_eq!(progress_bar(3, 3, 2), "[██] 100.0% (3/3)");
    }
}
