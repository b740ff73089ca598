mod dispatcher;
pub mod events;
mod result;
mod runner;
mod step;
mod tasks;
mod types;

pub use dispatcher::Dispatcher;
pub use events::{
    CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink, TracingEventSink,
};
pub use result::ExecutionError;
pub use runner::{new_execution_id, RunContext, ScenarioRunner};
pub use step::{decode_details, StepExecutor, StepFailure};
pub use tasks::RunManager;
pub use types::ExecutorConfig;
