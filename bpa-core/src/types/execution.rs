use chrono::Utc;
use serde_json::Value as JsonValue;

use crate::types::{StepKind, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    InProgress,
    Completed,
    Failed,
    /// Infrastructure fault, as opposed to a step reporting failure.
    #[serde(rename = "error")]
    Errored,
    Canceled,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::InProgress => "in_progress",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Errored => "error",
            ExecutionStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(ExecutionStatus::InProgress),
            "completed" => Some(ExecutionStatus::Completed),
            "failed" => Some(ExecutionStatus::Failed),
            "error" => Some(ExecutionStatus::Errored),
            "canceled" => Some(ExecutionStatus::Canceled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Error,
}

/// Outcome of one attempted step. Exactly one of `result` / `error` is set.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StepResult {
    #[serde(rename = "type")]
    pub kind: StepKind,

    pub order: i64,

    pub status: StepStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepResult {
    pub fn success(kind: StepKind, order: i64, result: JsonValue) -> Self {
        Self {
            kind,
            order,
            status: StepStatus::Success,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(kind: StepKind, order: i64, message: impl Into<String>) -> Self {
        Self {
            kind,
            order,
            status: StepStatus::Error,
            result: None,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// Durable record of one scenario run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionResult {
    pub id: String,

    pub scenario_id: String,

    pub status: ExecutionStatus,

    pub results: Vec<StepResult>,

    pub started_at: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn succeeded_steps(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed_steps(&self) -> usize {
        self.results.len() - self.succeeded_steps()
    }
}

/// An execution result under construction.
///
/// Steps can only be appended; [`ExecutionRecord::finish`] consumes the record,
/// so a run is finalized exactly once and cannot be touched afterwards.
/// Observers get copies through [`ExecutionRecord::snapshot`]; the record itself
/// cannot be duplicated:
///
/// ```compile_fail
/// let record = bpa_core::ExecutionRecord::begin("exec-1", "scn-1");
/// let _twin = record.clone();
/// ```
#[derive(Debug)]
pub struct ExecutionRecord {
    inner: ExecutionResult,
}

impl ExecutionRecord {
    pub fn begin(id: impl Into<String>, scenario_id: impl Into<String>) -> Self {
        Self {
            inner: ExecutionResult {
                id: id.into(),
                scenario_id: scenario_id.into(),
                status: ExecutionStatus::InProgress,
                results: Vec::new(),
                started_at: Utc::now(),
                completed_at: None,
                error: None,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn push(&mut self, result: StepResult) {
        self.inner.results.push(result);
    }

    pub fn results(&self) -> &[StepResult] {
        &self.inner.results
    }

    /// Snapshot of the in-progress state, for callers polling a running execution.
    pub fn snapshot(&self) -> ExecutionResult {
        self.inner.clone()
    }

    pub fn finish(mut self, status: ExecutionStatus, error: Option<String>) -> ExecutionResult {
        debug_assert!(status.is_terminal());
        self.inner.status = status;
        self.inner.error = error;
        self.inner.completed_at = Some(Utc::now());
        self.inner
    }
}
