//! Process exit codes, stable for scripts and CI.

/// Command succeeded; for `run`, the execution completed.
pub const SUCCESS: i32 = 0;
/// The scenario document or patch was rejected before anything ran.
pub const VALIDATION_FAILED: i32 = 2;
/// The run finished as `failed`, `error` or `canceled`.
pub const RUN_FAILED: i32 = 3;
/// Store, I/O or environment problem.
pub const RUNTIME_ERROR: i32 = 4;
