#![forbid(unsafe_code)]

//! Data model shared by the modelprobe crates: provider definitions, run
//! configuration, per-target inputs and outcomes, and the error classifier.

pub mod classify;
pub mod error;
pub mod settings;
pub mod types;

pub use crate::classify::{Classification, ErrorClassifier, Handbook};
pub use crate::error::{ConfigError, ParseError, ValidationError, Violation};
pub use crate::settings::{parse_settings_str, RunSettings, SettingsFormat};
pub use crate::types::{
    ApiType, AttemptOutcome, AttemptResult, CancelReason, ProviderConfig, RequestTemplate,
    ResultStatus, RunConfig, TargetSpec, TaskPhase, TaskStatus, TransportFailureKind,
};
