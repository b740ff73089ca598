mod common;
mod execution;
mod scenario;
mod step;
mod variable;

pub use common::{Details, Timestamp};
pub use execution::{ExecutionRecord, ExecutionResult, ExecutionStatus, StepResult, StepStatus};
pub use scenario::{Scenario, ScenarioDraft, ScenarioPatch, ScenarioStatus};
pub use step::{Step, StepKind};
pub use variable::{Variable, VariablePatch};
