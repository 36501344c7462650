use std::time::Duration;

use modelprobe_core::{AttemptResult, CancelReason, ValidationError};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("invalid run configuration: {0}")]
    InvalidConfig(#[from] ValidationError),
    #[error("worker pool closed unexpectedly")]
    PoolClosed,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    /// One entry per target, in completion order.
    pub results: Vec<AttemptResult>,
    pub completed: usize,
    pub total: usize,
    pub cancelled: Option<CancelReason>,
    pub elapsed: Duration,
}

impl RunOutcome {
    pub(crate) fn empty(run_id: Uuid) -> Self {
        Self {
            run_id,
            results: Vec::new(),
            completed: 0,
            total: 0,
            cancelled: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn successes(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.results.len() - self.successes()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures() == 0
    }
}
