use std::collections::BTreeSet;
use std::time::Duration;

use modelprobe_core::RunConfig;

/// Client errors that no retry can fix.
pub const TERMINAL_STATUSES: [u16; 4] = [400, 401, 403, 404];

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub terminal_statuses: BTreeSet<u16>,
    /// Full jitter over the computed delay. Off unless asked for.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            terminal_statuses: TERMINAL_STATUSES.into_iter().collect(),
            jitter: false,
        }
    }
}

impl RetryConfig {
    pub fn from_run_config(cfg: &RunConfig) -> Self {
        Self {
            max_retries: cfg.max_retries,
            ..Self::default()
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}
