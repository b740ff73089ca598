use std::collections::HashMap;
use std::sync::Arc;

use bpa_core::{Step, StepKind, StepResult};
use tracing::debug;

use crate::executor::step::StepExecutor;

/// Routes a step to the executor registered for its kind.
///
/// Adding a step kind means registering another executor; the runner loop is
/// unaware of the set of kinds.
#[derive(Default, Clone)]
pub struct Dispatcher {
    executors: HashMap<StepKind, Arc<dyn StepExecutor>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `executor` for `kind`, replacing any previous registration.
    pub fn register(&mut self, kind: StepKind, executor: Arc<dyn StepExecutor>) -> &mut Self {
        self.executors.insert(kind, executor);
        self
    }

    pub fn with(mut self, kind: StepKind, executor: Arc<dyn StepExecutor>) -> Self {
        self.register(kind, executor);
        self
    }

    pub async fn dispatch(&self, step: &Step) -> StepResult {
        let Some(executor) = self.executors.get(&step.kind) else {
            debug!(kind = %step.kind, order = step.order, "no executor registered");
            return StepResult::error(
                step.kind.clone(),
                step.order,
                format!("unsupported step kind: {}", step.kind),
            );
        };

        match executor.execute(&step.details).await {
            Ok(payload) => StepResult::success(step.kind.clone(), step.order, payload),
            Err(failure) => StepResult::error(step.kind.clone(), step.order, failure.to_string()),
        }
    }
}
