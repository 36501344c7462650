use std::time::Duration;

use modelprobe_core::{AttemptOutcome, TransportFailureKind};

use crate::retry::config::RetryConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter { delay: Duration, reason: RetryReason },
    Stop { reason: RetryReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    Succeeded,
    TerminalStatus(u16),
    AttemptsExhausted,
    HttpStatus(u16),
    TransportFailure(TransportFailureKind),
}

/// Delay slept after the `attempt_no`-th (1-based) failed attempt:
/// `base * 2^attempt_no`, capped at `max_delay`.
pub fn backoff_delay(cfg: &RetryConfig, attempt_no: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt_no).unwrap_or(u32::MAX);
    cfg.base_delay.saturating_mul(factor).min(cfg.max_delay)
}

/// Decide whether the target gets another attempt after `outcome`.
///
/// - `attempt_no`: 1-based number of the attempt that produced `outcome`.
/// - `rand_u64`: only consulted when jitter is enabled.
pub fn decide_retry(
    cfg: &RetryConfig,
    attempt_no: u32,
    outcome: &AttemptOutcome,
    rand_u64: impl Fn() -> u64,
) -> RetryDecision {
    let reason = match outcome {
        AttemptOutcome::Success { .. } => {
            return RetryDecision::Stop {
                reason: RetryReason::Succeeded,
            }
        }
        AttemptOutcome::ProtocolError { status, .. } => {
            if cfg.terminal_statuses.contains(status) {
                return RetryDecision::Stop {
                    reason: RetryReason::TerminalStatus(*status),
                };
            }
            RetryReason::HttpStatus(*status)
        }
        AttemptOutcome::TransportError { kind, .. } => RetryReason::TransportFailure(*kind),
    };

    if attempt_no >= cfg.max_attempts() {
        return RetryDecision::Stop {
            reason: RetryReason::AttemptsExhausted,
        };
    }

    let delay = backoff_delay(cfg, attempt_no);
    let delay = if cfg.jitter {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        if ms == 0 {
            delay
        } else {
            Duration::from_millis(rand_u64() % ms.saturating_add(1))
        }
    } else {
        delay
    };
    RetryDecision::RetryAfter { delay, reason }
}
