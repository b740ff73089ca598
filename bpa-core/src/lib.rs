#![forbid(unsafe_code)]

pub mod error;
pub mod parser;
pub mod types;
pub mod validate;

pub use crate::error::{ParseError, ValidationError, Violation};
pub use crate::parser::{
    parse_patch_str, parse_scenario_str, parse_scenario_text, DocumentFormat, ParsedScenario,
    UNNAMED_SCENARIO,
};
pub use crate::types::{
    ExecutionRecord, ExecutionResult, ExecutionStatus, Scenario, ScenarioDraft, ScenarioPatch,
    ScenarioStatus, Step, StepKind, StepResult, StepStatus, Variable, VariablePatch,
};
pub use crate::validate::{validate_draft, Validate};
