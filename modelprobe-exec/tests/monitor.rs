use std::sync::{Arc, Mutex};
use std::time::Duration;

use modelprobe_core::TaskPhase;
use modelprobe_exec::executor::{
    progress_bar, RunProgress, StatusBoard, StatusMonitor, StatusRenderer, StatusSnapshot,
};

#[derive(Default)]
struct Frames {
    frames: Mutex<Vec<StatusSnapshot>>,
    finished: Mutex<bool>,
}

impl StatusRenderer for Frames {
    fn render(&self, snapshot: &StatusSnapshot) {
        self.frames.lock().unwrap().push(snapshot.clone());
    }

    fn finish(&self) {
        *self.finished.lock().unwrap() = true;
    }
}

#[tokio::test(start_paused = true)]
async fn renders_board_copies_until_stopped() {
    let board = Arc::new(StatusBoard::new());
    let progress = Arc::new(RunProgress::new(3));
    let frames = Arc::new(Frames::default());
    board.begin(4, "claude-3-haiku");
    board.update(4, |s| {
        s.phase = TaskPhase::Retry(1);
        s.retry_count = 1;
        s.latency_ms = 812;
    });
    progress.complete_one();

    let monitor = StatusMonitor::start(
        Duration::from_millis(200),
        8,
        board.clone(),
        progress.clone(),
        frames.clone(),
    );
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    monitor.stop().await;

    let count = frames.frames.lock().unwrap().len();
    assert!(count >= 5, "only {count} frames");
    assert!(*frames.finished.lock().unwrap());

    tokio::time::sleep(Duration::from_secs(2)).await;
    let all = frames.frames.lock().unwrap();
    assert_eq!(all.len(), count);

    let frame = &all[0];
    assert_eq!(frame.max_workers, 8);
    assert_eq!((frame.completed, frame.total), (1, 3));
    assert_eq!(frame.active.len(), 1);
    assert_eq!(frame.active[0].slot, 4);
    assert_eq!(frame.active[0].target_id, "claude-3-haiku");
    assert_eq!(frame.active[0].retry_count, 1);
    assert_eq!(frame.active[0].latency_ms, 812);
    assert_eq!(frame.active[0].phase.to_string(), "retry_1");
}

#[tokio::test(start_paused = true)]
async fn board_changes_show_up_in_later_frames() {
    let board = Arc::new(StatusBoard::new());
    let progress = Arc::new(RunProgress::new(1));
    let frames = Arc::new(Frames::default());
    board.begin(0, "m");

    let monitor = StatusMonitor::start(
        Duration::from_millis(100),
        1,
        board.clone(),
        progress.clone(),
        frames.clone(),
    );
    tokio::time::sleep(Duration::from_millis(250)).await;
    board.remove(0);
    progress.complete_one();
    tokio::time::sleep(Duration::from_millis(250)).await;
    monitor.stop().await;

    let all = frames.frames.lock().unwrap();
    let last = all.last().unwrap();
    assert!(last.active.is_empty());
    assert_eq!(last.completed, 1);
    assert_eq!(all[0].active.len(), 1);
}

#[test]
fn progress_bar_matches_expected_layout() {
    assert_eq!(progress_bar(2, 5, 10), "[████░░░░░░] 40.0% (2/5)");
    assert_eq!(progress_bar(0, 3, 3), "[░░░] 0.0% (0/3)");
}
