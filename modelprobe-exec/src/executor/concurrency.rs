use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::executor::result::ExecutionError;

/// Bounds how many targets execute at once.
#[derive(Clone)]
pub struct WorkerLimit {
    permits: Arc<Semaphore>,
}

impl WorkerLimit {
    pub fn new(limit: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(limit)),
        }
    }

    pub async fn acquire(&self) -> Result<WorkerPermit, ExecutionError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ExecutionError::PoolClosed)?;
        Ok(WorkerPermit { _permit: permit })
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

/// Held for the lifetime of one target task.
pub struct WorkerPermit {
    _permit: OwnedSemaphorePermit,
}
