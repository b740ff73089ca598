use async_trait::async_trait;
use bpa_core::{ExecutionStatus, StepKind};
use serde_json::json;

#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        execution_id: String,
        scenario_id: String,
        steps: usize,
    },
    RunFinished {
        execution_id: String,
        status: ExecutionStatus,
        error: Option<String>,
    },
    StepStarted {
        execution_id: String,
        order: i64,
        kind: StepKind,
    },
    StepSucceeded {
        execution_id: String,
        order: i64,
        kind: StepKind,
    },
    StepFailed {
        execution_id: String,
        order: i64,
        kind: StepKind,
        error: String,
    },
}

impl Event {
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::RunStarted { .. } => "run.started",
            Event::RunFinished { .. } => "run.finished",
            Event::StepStarted { .. } => "step.started",
            Event::StepSucceeded { .. } => "step.succeeded",
            Event::StepFailed { .. } => "step.failed",
        }
    }

    pub fn execution_id(&self) -> &str {
        match self {
            Event::RunStarted { execution_id, .. }
            | Event::RunFinished { execution_id, .. }
            | Event::StepStarted { execution_id, .. }
            | Event::StepSucceeded { execution_id, .. }
            | Event::StepFailed { execution_id, .. } => execution_id,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut value = match self {
            Event::RunStarted { scenario_id, steps, .. } => {
                json!({ "scenario_id": scenario_id, "steps": steps })
            }
            Event::RunFinished { status, error, .. } => {
                json!({ "status": status.as_str(), "error": error })
            }
            Event::StepStarted { order, kind, .. } | Event::StepSucceeded { order, kind, .. } => {
                json!({ "order": order, "kind": kind.as_str() })
            }
            Event::StepFailed { order, kind, error, .. } => {
                json!({ "order": order, "kind": kind.as_str(), "error": error })
            }
        };
        if let Some(obj) = value.as_object_mut() {
            obj.insert("type".to_string(), json!(self.type_name()));
            obj.insert("execution_id".to_string(), json!(self.execution_id()));
        }
        value
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// One JSON object per line on stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        println!("{}", serde_json::to_string(&event.to_json()).unwrap_or_default());
    }
}

/// Forwards events to `tracing` under the `bpa::events` target.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        match &event {
            Event::RunStarted { execution_id, scenario_id, steps } => {
                tracing::info!(target: "bpa::events", %execution_id, %scenario_id, steps, "run started");
            }
            Event::RunFinished { execution_id, status, error } => {
                tracing::info!(
                    target: "bpa::events",
                    %execution_id,
                    status = status.as_str(),
                    error = error.as_deref().unwrap_or(""),
                    "run finished"
                );
            }
            Event::StepStarted { execution_id, order, kind } => {
                tracing::debug!(target: "bpa::events", %execution_id, order, %kind, "step started");
            }
            Event::StepSucceeded { execution_id, order, kind } => {
                tracing::debug!(target: "bpa::events", %execution_id, order, %kind, "step succeeded");
            }
            Event::StepFailed { execution_id, order, kind, error } => {
                tracing::warn!(target: "bpa::events", %execution_id, order, %kind, %error, "step failed");
            }
        }
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
