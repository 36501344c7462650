mod outcome;
mod provider;
mod result;
mod run_config;
mod status;
mod target;

pub use outcome::{AttemptOutcome, TransportFailureKind};
pub use provider::{ApiType, ProviderConfig};
pub use result::{AttemptResult, CancelReason, ResultStatus, ResultStatusParseError};
pub use run_config::{RequestTemplate, RunConfig};
pub use status::{TaskPhase, TaskStatus};
pub use target::{endpoint_url, mask_key, ApiKey, TargetSpec};
