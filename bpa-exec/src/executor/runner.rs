use std::collections::HashSet;
use std::sync::Arc;

use bpa_core::{ExecutionRecord, ExecutionResult, ExecutionStatus, Scenario, Step, StepResult};
use bpa_store::ScenarioStore;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::executor::dispatcher::Dispatcher;
use crate::executor::events::{Event, EventSink};
use crate::executor::result::ExecutionError;
use crate::executor::types::ExecutorConfig;

pub fn new_execution_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Per-run handles: the execution identifier, the cancellation token and an
/// optional channel receiving in-progress snapshots.
#[derive(Debug)]
pub struct RunContext {
    pub execution_id: String,
    pub cancel: CancellationToken,
    progress: Option<watch::Sender<ExecutionResult>>,
}

impl RunContext {
    pub fn new(execution_id: impl Into<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: watch::Sender<ExecutionResult>) -> Self {
        self.progress = Some(progress);
        self
    }

    fn publish(&self, record: &ExecutionRecord) {
        if let Some(tx) = &self.progress {
            tx.send_replace(record.snapshot());
        }
    }
}

/// Sequential, fail-fast scenario runner.
///
/// One call to [`ScenarioRunner::run`] is one run: it loads the scenario,
/// executes its steps in ascending `order`, stops at the first failed step and
/// persists the finalized record.
pub struct ScenarioRunner {
    config: ExecutorConfig,
    store: Arc<dyn ScenarioStore>,
    dispatcher: Arc<Dispatcher>,
    event_sink: Arc<dyn EventSink>,
}

impl ScenarioRunner {
    pub fn new(
        config: ExecutorConfig,
        store: Arc<dyn ScenarioStore>,
        dispatcher: Arc<Dispatcher>,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        Self { config, store, dispatcher, event_sink }
    }

    pub fn store(&self) -> &Arc<dyn ScenarioStore> {
        &self.store
    }

    /// Run a scenario under a fresh execution identifier.
    ///
    /// Every outcome, including a missing scenario, yields a persisted record.
    /// `Err` is returned only when that record cannot be saved.
    pub async fn run(&self, scenario_id: &str) -> Result<ExecutionResult, ExecutionError> {
        self.run_with(scenario_id, RunContext::new(new_execution_id())).await
    }

    pub async fn run_with(
        &self,
        scenario_id: &str,
        ctx: RunContext,
    ) -> Result<ExecutionResult, ExecutionError> {
        let result = match self.store.get_scenario(scenario_id).await {
            Ok(Some(scenario)) => self.execute(&scenario, &ctx).await,
            Ok(None) => {
                self.abort_before_start(&ctx, scenario_id, format!("scenario not found: {scenario_id}"))
                    .await
            }
            Err(e) => {
                self.abort_before_start(&ctx, scenario_id, format!("failed to load scenario: {e}"))
                    .await
            }
        };

        if let Err(e) = self.store.save_execution(&result).await {
            error!(
                execution_id = %result.id,
                scenario_id,
                error = %e,
                "failed to persist execution result"
            );
            return Err(ExecutionError::Store(e));
        }
        Ok(result)
    }

    /// Execute an already loaded scenario without persisting the outcome.
    pub async fn execute(&self, scenario: &Scenario, ctx: &RunContext) -> ExecutionResult {
        let mut record = ExecutionRecord::begin(ctx.execution_id.clone(), scenario.id.clone());
        ctx.publish(&record);

        self.event_sink
            .emit(Event::RunStarted {
                execution_id: ctx.execution_id.clone(),
                scenario_id: scenario.id.clone(),
                steps: scenario.steps.len(),
            })
            .await;
        info!(
            execution_id = %ctx.execution_id,
            scenario_id = %scenario.id,
            steps = scenario.steps.len(),
            "run started"
        );

        if let Some(order) = first_duplicate_order(&scenario.steps) {
            let msg = format!("scenario has more than one step with order {order}");
            return self.finish(record, ExecutionStatus::Errored, Some(msg)).await;
        }

        for step in scenario.ordered_steps() {
            if ctx.cancel.is_cancelled() {
                let msg = format!("run canceled before step {}", step.order);
                return self.finish(record, ExecutionStatus::Canceled, Some(msg)).await;
            }

            self.event_sink
                .emit(Event::StepStarted {
                    execution_id: ctx.execution_id.clone(),
                    order: step.order,
                    kind: step.kind.clone(),
                })
                .await;

            // Every attempted step leaves a result, even one that never returned.
            let step_result = match self.attempt(step, &ctx.cancel).await {
                Attempt::Finished(r) => r,
                Attempt::Canceled => {
                    record.push(StepResult::error(step.kind.clone(), step.order, "canceled"));
                    ctx.publish(&record);
                    let msg = format!("run canceled during step {}", step.order);
                    return self.finish(record, ExecutionStatus::Canceled, Some(msg)).await;
                }
                Attempt::Crashed(e) => {
                    let crash = format!("crashed: {e}");
                    record.push(StepResult::error(step.kind.clone(), step.order, crash.clone()));
                    ctx.publish(&record);
                    let msg = format!("step {} ({}) {crash}", step.order, step.kind);
                    return self.finish(record, ExecutionStatus::Errored, Some(msg)).await;
                }
            };

            let failure = step_result.error.clone().filter(|_| !step_result.is_success());
            record.push(step_result);
            ctx.publish(&record);

            if let Some(error) = failure {
                self.event_sink
                    .emit(Event::StepFailed {
                        execution_id: ctx.execution_id.clone(),
                        order: step.order,
                        kind: step.kind.clone(),
                        error: error.clone(),
                    })
                    .await;
                let msg = format!("step {} ({}) failed: {error}", step.order, step.kind);
                return self.finish(record, ExecutionStatus::Failed, Some(msg)).await;
            }

            self.event_sink
                .emit(Event::StepSucceeded {
                    execution_id: ctx.execution_id.clone(),
                    order: step.order,
                    kind: step.kind.clone(),
                })
                .await;
        }

        self.finish(record, ExecutionStatus::Completed, None).await
    }

    /// Run one step as its own task so a panicking executor cannot take the
    /// runner down with it.
    async fn attempt(&self, step: &Step, cancel: &CancellationToken) -> Attempt {
        let dispatcher = self.dispatcher.clone();
        let timeout = self.config.step_timeout;
        let step = step.clone();

        let mut handle = tokio::spawn(async move {
            match tokio::time::timeout(timeout, dispatcher.dispatch(&step)).await {
                Ok(result) => result,
                Err(_) => StepResult::error(
                    step.kind.clone(),
                    step.order,
                    format!("step timed out after {}s", timeout.as_secs()),
                ),
            }
        });

        tokio::select! {
            _ = cancel.cancelled() => {
                // Dropping the step future releases whatever it holds (browser sessions included).
                handle.abort();
                Attempt::Canceled
            }
            joined = &mut handle => match joined {
                Ok(result) => Attempt::Finished(result),
                Err(e) => Attempt::Crashed(ExecutionError::TaskJoin(e.to_string())),
            },
        }
    }

    async fn abort_before_start(
        &self,
        ctx: &RunContext,
        scenario_id: &str,
        message: String,
    ) -> ExecutionResult {
        warn!(execution_id = %ctx.execution_id, scenario_id, %message, "run could not start");
        let record = ExecutionRecord::begin(ctx.execution_id.clone(), scenario_id);
        self.finish(record, ExecutionStatus::Errored, Some(message)).await
    }

    async fn finish(
        &self,
        record: ExecutionRecord,
        status: ExecutionStatus,
        error: Option<String>,
    ) -> ExecutionResult {
        let result = record.finish(status, error);
        debug!(
            execution_id = %result.id,
            status = result.status.as_str(),
            attempted = result.results.len(),
            "run finished"
        );
        self.event_sink
            .emit(Event::RunFinished {
                execution_id: result.id.clone(),
                status: result.status,
                error: result.error.clone(),
            })
            .await;
        result
    }
}

enum Attempt {
    Finished(StepResult),
    Canceled,
    Crashed(ExecutionError),
}

fn first_duplicate_order(steps: &[Step]) -> Option<i64> {
    let mut seen = HashSet::new();
    steps.iter().map(|s| s.order).find(|o| !seen.insert(*o))
}
