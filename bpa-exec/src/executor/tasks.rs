use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use bpa_core::{ExecutionRecord, ExecutionResult};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::executor::result::ExecutionError;
use crate::executor::runner::{new_execution_id, RunContext, ScenarioRunner};

type RunOutcome = Result<ExecutionResult, ExecutionError>;

struct RunSlot {
    cancel: CancellationToken,
    progress: watch::Receiver<ExecutionResult>,
    done: watch::Receiver<Option<RunOutcome>>,
}

type Runs = Arc<Mutex<HashMap<String, RunSlot>>>;

/// Removes a run's slot when its task ends, panics included.
struct SlotGuard {
    runs: Runs,
    execution_id: String,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.runs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.execution_id);
    }
}

/// Background runs keyed by execution identifier.
///
/// A slot lives until its run's final record has been handed to the store;
/// after that, lookups are served by the store alone.
pub struct RunManager {
    runner: Arc<ScenarioRunner>,
    runs: Runs,
}

impl RunManager {
    pub fn new(runner: Arc<ScenarioRunner>) -> Self {
        Self {
            runner,
            runs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start a run in the background and return its execution identifier.
    pub fn trigger(&self, scenario_id: &str) -> String {
        let execution_id = new_execution_id();
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(
            ExecutionRecord::begin(execution_id.clone(), scenario_id).snapshot(),
        );
        let ctx = RunContext::new(execution_id.clone())
            .with_cancel(cancel.clone())
            .with_progress(tx);

        let (done_tx, done_rx) = watch::channel(None);
        let runner = self.runner.clone();
        let guard = SlotGuard {
            runs: self.runs.clone(),
            execution_id: execution_id.clone(),
        };
        let scenario_id = scenario_id.to_string();

        // Hold the map while spawning so the task cannot remove its slot before it exists.
        let mut runs = self.runs.lock().unwrap_or_else(PoisonError::into_inner);
        tokio::spawn(async move {
            let outcome = runner.run_with(&scenario_id, ctx).await;
            if let Err(e) = &outcome {
                error!(execution_id = %guard.execution_id, error = %e, "background run lost its result");
            }
            done_tx.send_replace(Some(outcome));
            drop(guard);
        });
        runs.insert(
            execution_id.clone(),
            RunSlot {
                cancel,
                progress: rx,
                done: done_rx,
            },
        );
        drop(runs);

        info!(%execution_id, "run triggered");
        execution_id
    }

    /// Request cancellation. Returns `false` if no such run is in flight.
    pub fn cancel(&self, execution_id: &str) -> bool {
        let runs = self.runs.lock().unwrap_or_else(PoisonError::into_inner);
        match runs.get(execution_id) {
            Some(slot) => {
                slot.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self, execution_id: &str) -> bool {
        self.runs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(execution_id)
    }

    /// Wait for a run to finish and return its final record.
    ///
    /// Any number of callers may wait on the same run, and dropping one waiter
    /// does not affect the others.
    pub async fn wait(&self, execution_id: &str) -> RunOutcome {
        let done = self
            .runs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(execution_id)
            .map(|slot| slot.done.clone());

        match done {
            Some(mut done) => {
                let finished = done
                    .wait_for(Option::is_some)
                    .await
                    .ok()
                    .and_then(|outcome| (*outcome).clone());
                finished.unwrap_or_else(|| {
                    Err(ExecutionError::TaskJoin(format!("run {execution_id} ended without a result")))
                })
            }
            None => self
                .runner
                .store()
                .get_execution(execution_id)
                .await?
                .ok_or_else(|| ExecutionError::UnknownExecution(execution_id.to_string())),
        }
    }

    /// Latest known state of a run: an `in_progress` snapshot while it is in
    /// flight, the persisted record afterwards.
    pub async fn lookup(&self, execution_id: &str) -> Result<Option<ExecutionResult>, ExecutionError> {
        let snapshot = self
            .runs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(execution_id)
            .map(|slot| slot.progress.borrow().clone());
        if let Some(snapshot) = snapshot {
            return Ok(Some(snapshot));
        }
        Ok(self.runner.store().get_execution(execution_id).await?)
    }
}
