use std::sync::Arc;
use std::time::Duration;

use modelprobe_core::CancelReason;
use modelprobe_exec::executor::concurrency::WorkerLimit;
use modelprobe_exec::executor::{CancellationSignal, RunProgress, StatusBoard};
use modelprobe_core::TaskPhase;

#[tokio::test(start_paused = true)]
async fn worker_limit_blocks_until_a_permit_is_released() {
    let limit = WorkerLimit::new(2);
    let p1 = limit.acquire().await.unwrap();
    let _p2 = limit.acquire().await.unwrap();
    assert_eq!(limit.available(), 0);

    let waiter = {
        let limit = limit.clone();
        tokio::spawn(async move { limit.acquire().await.map(|_| tokio::time::Instant::now()) })
    };
    let start = tokio::time::Instant::now();
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(p1);
    let acquired_at = waiter.await.unwrap().unwrap();
    assert!(acquired_at - start >= Duration::from_millis(50));
}

#[tokio::test]
async fn signal_keeps_first_reason() {
    let signal = CancellationSignal::new();
    assert!(!signal.is_cancelled());
    assert!(signal.cancel(CancelReason::GlobalTimeout));
    assert!(!signal.cancel(CancelReason::External));
    assert_eq!(signal.reason(), Some(CancelReason::GlobalTimeout));
    signal.cancelled().await;
}

#[tokio::test(start_paused = true)]
async fn signal_wakes_waiters() {
    let signal = Arc::new(CancellationSignal::new());
    let waiter = {
        let signal = signal.clone();
        tokio::spawn(async move { signal.cancelled().await })
    };
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!waiter.is_finished());
    signal.cancel(CancelReason::External);
    waiter.await.unwrap();
}

#[test]
fn board_tracks_entries_by_slot() {
    let board = StatusBoard::new();
    board.begin(0, "gpt-4o");
    board.begin(1, "gpt-4o");
    board.update(1, |s| {
        s.phase = TaskPhase::Retry(2);
        s.retry_count = 2;
    });
    let snapshot = board.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[1].1.phase, TaskPhase::Retry(2));

    board.remove(0);
    board.update(0, |s| s.latency_ms = 99);
    assert_eq!(board.len(), 1);
    assert_eq!(board.snapshot()[0].0, 1);
}

#[test]
fn progress_counts_monotonically() {
    let progress = RunProgress::new(3);
    assert_eq!(progress.complete_one(), 1);
    assert_eq!(progress.complete_one(), 2);
    assert_eq!(progress.completed(), 2);
    assert_eq!(progress.total(), 3);
}
