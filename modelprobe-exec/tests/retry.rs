use std::time::Duration;

use modelprobe_core::{AttemptOutcome, TransportFailureKind};
use modelprobe_exec::retry::{backoff_delay, decide_retry, RetryConfig, RetryDecision, RetryReason};

fn http(status: u16) -> AttemptOutcome {
    AttemptOutcome::from_response(status, String::new())
}

fn transport() -> AttemptOutcome {
    AttemptOutcome::TransportError {
        kind: TransportFailureKind::Connect,
        message: "connection refused".to_string(),
    }
}

#[test]
fn backoff_doubles_and_caps_at_ten_seconds() {
    let cfg = RetryConfig::default();
    let delays: Vec<u64> = (1..=6).map(|k| backoff_delay(&cfg, k).as_secs()).collect();
    assert_eq!(delays, vec![2, 4, 8, 10, 10, 10]);
    assert_eq!(backoff_delay(&cfg, 64), Duration::from_secs(10));
}

#[test]
fn success_stops() {
    let d = decide_retry(&RetryConfig::default(), 1, &http(200), || 0);
    assert_eq!(d, RetryDecision::Stop { reason: RetryReason::Succeeded });
}

#[test]
fn terminal_client_errors_stop_immediately() {
    let cfg = RetryConfig::default();
    for status in [400, 401, 403, 404] {
        let d = decide_retry(&cfg, 1, &http(status), || 0);
        assert_eq!(d, RetryDecision::Stop { reason: RetryReason::TerminalStatus(status) });
    }
}

#[test]
fn rate_limit_and_server_errors_are_retried() {
    let cfg = RetryConfig::default();
    for status in [429, 500, 502, 503] {
        let d = decide_retry(&cfg, 1, &http(status), || 0);
        assert_eq!(
            d,
            RetryDecision::RetryAfter {
                delay: Duration::from_secs(2),
                reason: RetryReason::HttpStatus(status),
            }
        );
    }
}

#[test]
fn transport_failures_are_retried_until_budget_is_spent() {
    let cfg = RetryConfig {
        max_retries: 2,
        ..RetryConfig::default()
    };
    assert!(matches!(
        decide_retry(&cfg, 2, &transport(), || 0),
        RetryDecision::RetryAfter {
            reason: RetryReason::TransportFailure(TransportFailureKind::Connect),
            ..
        }
    ));
    assert_eq!(
        decide_retry(&cfg, 3, &transport(), || 0),
        RetryDecision::Stop { reason: RetryReason::AttemptsExhausted }
    );
}

#[test]
fn zero_retries_means_single_attempt() {
    let cfg = RetryConfig {
        max_retries: 0,
        ..RetryConfig::default()
    };
    assert_eq!(
        decide_retry(&cfg, 1, &http(500), || 0),
        RetryDecision::Stop { reason: RetryReason::AttemptsExhausted }
    );
}

#[test]
fn jitter_stays_within_computed_delay() {
    let cfg = RetryConfig {
        jitter: true,
        ..RetryConfig::default()
    };
    match decide_retry(&cfg, 2, &http(503), || 1_500) {
        RetryDecision::RetryAfter { delay, .. } => assert_eq!(delay, Duration::from_millis(1_500)),
        other => panic!("unexpected decision {other:?}"),
    }
    match decide_retry(&cfg, 2, &http(503), || u64::MAX) {
        RetryDecision::RetryAfter { delay, .. } => assert!(delay <= Duration::from_secs(4)),
        other => panic!("unexpected decision {other:?}"),
    }
}
