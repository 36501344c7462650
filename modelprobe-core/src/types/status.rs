use std::time::Instant;

/// Lifecycle phase of an executing task as shown by the status monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Starting,
    Running,
    /// Carries the 1-based retry number.
    Retry(u32),
}

impl std::fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPhase::Starting => f.write_str("starting"),
            TaskPhase::Running => f.write_str("running"),
            TaskPhase::Retry(n) => write!(f, "retry_{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatus {
    pub target_id: String,
    pub phase: TaskPhase,
    pub start_time: Instant,
    pub retry_count: u32,
    pub latency_ms: u64,
}

impl TaskStatus {
    pub fn starting(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            phase: TaskPhase::Starting,
            start_time: Instant::now(),
            retry_count: 0,
            latency_ms: 0,
        }
    }
}
