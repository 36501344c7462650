use std::fmt::Write as _;
use std::io::Write as _;

use modelprobe_core::TaskPhase;
use modelprobe_exec::executor::{progress_bar, StatusRenderer, StatusSnapshot};

const BAR_WIDTH: usize = 50;
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Redraws the live run status on stderr every tick.
pub struct TerminalStatusRenderer {
    provider: String,
}

impl TerminalStatusRenderer {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }
}

fn phase_icon(phase: TaskPhase) -> &'static str {
    match phase {
        TaskPhase::Starting => "⏳",
        TaskPhase::Running => "🔄",
        TaskPhase::Retry(_) => "🔁",
    }
}

pub fn render_frame(provider: &str, snapshot: &StatusSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Testing {provider}: {} active / {} workers, {:.1}s elapsed",
        snapshot.active.len(),
        snapshot.max_workers,
        snapshot.elapsed.as_secs_f64()
    );
    let _ = writeln!(
        out,
        "{}",
        progress_bar(snapshot.completed, snapshot.total, BAR_WIDTH)
    );
    for task in &snapshot.active {
        let _ = writeln!(
            out,
            "  {} {:<40} {:>6}ms  {:<8} retries: {}",
            phase_icon(task.phase),
            task.target_id,
            task.latency_ms,
            task.phase.to_string(),
            task.retry_count
        );
    }
    out
}

impl StatusRenderer for TerminalStatusRenderer {
    fn render(&self, snapshot: &StatusSnapshot) {
        let frame = render_frame(&self.provider, snapshot);
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "{CLEAR_SCREEN}{frame}");
        let _ = err.flush();
    }
}
