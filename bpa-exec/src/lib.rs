#![forbid(unsafe_code)]

//! Scenario execution engine: step executors, the kind-to-executor dispatcher,
//! the sequential runner and the background run manager.
//!
//! Scenario parsing and validation live in `bpa-core`; persistence in `bpa-store`.

pub mod agent;
pub mod document;
pub mod executor;
pub mod template;
pub mod web;

pub use crate::executor::{
    Dispatcher, ExecutionError, ExecutorConfig, RunContext, RunManager, ScenarioRunner,
    StepExecutor, StepFailure,
};
