//! Process exit codes of `modelprobe`, stable for scripts and CI.

pub const SUCCESS: i32 = 0;
/// Bad flags, settings, or provider definitions; nothing was probed.
pub const VALIDATION_FAILED: i32 = 2;
/// The run finished but at least one model failed or was cancelled.
pub const RUN_FAILED: i32 = 3;
/// I/O, HTTP client, or discovery failure outside the probe results.
pub const RUNTIME_ERROR: i32 = 4;
