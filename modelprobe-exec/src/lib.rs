#![forbid(unsafe_code)]

//! Probe engine: runs one request per model target through a bounded worker
//! pool with per-target retries, a global deadline and a live status board.

pub mod discovery;
pub mod executor;
pub mod http;
pub mod report;
pub mod retry;

pub use crate::discovery::{discover_models, DiscoveredModel, DiscoveryError};
pub use crate::executor::{
    AttemptExecutor, CancellationSignal, Event, EventSink, ExecutionError, Executor, RunOutcome,
    StatusMonitor, StatusRenderer, StatusSnapshot,
};
pub use crate::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts, ReqwestHttpClient};
pub use crate::report::{read_report, report_file_name, ReportError, ReportRow, ReportWriter};
pub use crate::retry::{backoff_delay, decide_retry, RetryConfig, RetryDecision, RetryReason};
