mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bpa_core::types::Details;
use bpa_core::{ExecutionStatus, Step, StepKind};
use bpa_exec::executor::{
    Dispatcher, ExecutionError, ExecutorConfig, NoOpEventSink, RunManager, ScenarioRunner,
    StepExecutor, StepFailure,
};
use bpa_exec::web::WebExecutor;
use bpa_store::{MemoryStore, ScenarioStore};
use serde_json::{json, Value as JsonValue};
use tokio::sync::Notify;

use common::{scenario, FakeBrowser, ScriptedExecutor};

/// Signals `started` on entry, then blocks until `release` is notified.
struct GatedExecutor {
    started: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl StepExecutor for GatedExecutor {
    async fn execute(&self, _details: &Details) -> Result<JsonValue, StepFailure> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(json!("released"))
    }
}

fn manager(store: Arc<MemoryStore>, dispatcher: Dispatcher) -> RunManager {
    let runner = ScenarioRunner::new(
        ExecutorConfig::default(),
        store,
        Arc::new(dispatcher),
        Arc::new(NoOpEventSink),
    );
    RunManager::new(Arc::new(runner))
}

#[tokio::test]
async fn triggered_run_is_persisted_before_it_is_reported_done() {
    let s = scenario(vec![Step::new(StepKind::Template, json!({}), 1)]);
    let store = Arc::new(MemoryStore::with_scenarios([s.clone()]));
    let dispatcher = Dispatcher::new().with(StepKind::Template, Arc::new(ScriptedExecutor::default()));
    let manager = manager(store.clone(), dispatcher);

    let id = manager.trigger(&s.id);
    let done = manager.wait(&id).await.unwrap();

    assert_eq!(done.id, id);
    assert_eq!(done.status, ExecutionStatus::Completed);
    assert_eq!(store.get_execution(&id).await.unwrap(), Some(done.clone()));
    assert_eq!(manager.lookup(&id).await.unwrap(), Some(done));
}

#[tokio::test]
async fn lookup_reports_progress_while_running() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let gated = GatedExecutor {
        started: started.clone(),
        release: release.clone(),
    };
    let s = scenario(vec![
        Step::new(StepKind::Template, json!({}), 1),
        Step::new(StepKind::Ai, json!({}), 2),
    ]);
    let store = Arc::new(MemoryStore::with_scenarios([s.clone()]));
    let dispatcher = Dispatcher::new()
        .with(StepKind::Template, Arc::new(ScriptedExecutor::default()))
        .with(StepKind::Ai, Arc::new(gated));
    let manager = manager(store.clone(), dispatcher);

    let id = manager.trigger(&s.id);
    started.notified().await;

    let snapshot = manager.lookup(&id).await.unwrap().unwrap();
    assert_eq!(snapshot.status, ExecutionStatus::InProgress);
    assert_eq!(snapshot.results.len(), 1);
    assert!(snapshot.completed_at.is_none());
    assert!(manager.is_running(&id));
    assert!(store.get_execution(&id).await.unwrap().is_none());

    release.notify_one();
    let done = manager.wait(&id).await.unwrap();
    assert_eq!(done.status, ExecutionStatus::Completed);
    assert_eq!(done.results.len(), 2);
}

#[tokio::test]
async fn cancel_stops_the_run_and_releases_the_browser() {
    let browser = FakeBrowser::hanging();
    let s = scenario(vec![
        Step::new(StepKind::Web, json!({"url": "https://example.test"}), 1),
        Step::new(StepKind::Template, json!({}), 2),
    ]);
    let store = Arc::new(MemoryStore::with_scenarios([s.clone()]));
    let later = Arc::new(ScriptedExecutor::default());
    let dispatcher = Dispatcher::new()
        .with(StepKind::Web, Arc::new(WebExecutor::new(Arc::new(browser.clone()))))
        .with(StepKind::Template, later.clone());
    let manager = manager(store.clone(), dispatcher);

    let id = manager.trigger(&s.id);
    while browser.snapshot().0 == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(manager.cancel(&id));

    let done = manager.wait(&id).await.unwrap();
    assert_eq!(done.status, ExecutionStatus::Canceled);
    assert_eq!(done.error.as_deref(), Some("run canceled during step 1"));
    assert_eq!(done.results.len(), 1);
    assert_eq!(done.results[0].order, 1);
    assert_eq!(done.results[0].error.as_deref(), Some("canceled"));
    assert_eq!(later.call_count(), 0);

    // The abandoned session is closed by its guard on a spawned task.
    let mut closed = 0;
    for _ in 0..100 {
        closed = browser.snapshot().1;
        if closed == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(closed, 1);
}

#[tokio::test]
async fn unknown_runs_are_reported() {
    let manager = manager(Arc::new(MemoryStore::new()), Dispatcher::new());

    assert!(!manager.cancel("nope"));
    assert_eq!(manager.lookup("nope").await.unwrap(), None);
    assert!(matches!(
        manager.wait("nope").await,
        Err(ExecutionError::UnknownExecution(_))
    ));
}

#[tokio::test]
async fn concurrent_runs_of_one_scenario_are_independent() {
    let s = scenario(vec![Step::new(StepKind::Template, json!({}), 1)]);
    let store = Arc::new(MemoryStore::with_scenarios([s.clone()]));
    let dispatcher = Dispatcher::new().with(StepKind::Template, Arc::new(ScriptedExecutor::default()));
    let manager = manager(store.clone(), dispatcher);

    let a = manager.trigger(&s.id);
    let b = manager.trigger(&s.id);
    let ra = manager.wait(&a).await.unwrap();
    let rb = manager.wait(&b).await.unwrap();

    assert_ne!(ra.id, rb.id);
    assert_eq!(store.list_executions(&s.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn every_waiter_sees_the_final_record() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let gated = GatedExecutor {
        started: started.clone(),
        release: release.clone(),
    };
    let s = scenario(vec![Step::new(StepKind::Ai, json!({}), 1)]);
    let store = Arc::new(MemoryStore::with_scenarios([s.clone()]));
    let manager = manager(store, Dispatcher::new().with(StepKind::Ai, Arc::new(gated)));

    let id = manager.trigger(&s.id);
    started.notified().await;

    let (first, second, ()) = tokio::join!(manager.wait(&id), manager.wait(&id), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        release.notify_one();
    });

    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(first.status, ExecutionStatus::Completed);
    assert_eq!(first, second);
}

#[tokio::test]
async fn abandoned_waiter_does_not_affect_later_waiters() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let gated = GatedExecutor {
        started: started.clone(),
        release: release.clone(),
    };
    let s = scenario(vec![Step::new(StepKind::Ai, json!({}), 1)]);
    let store = Arc::new(MemoryStore::with_scenarios([s.clone()]));
    let manager = manager(store, Dispatcher::new().with(StepKind::Ai, Arc::new(gated)));

    let id = manager.trigger(&s.id);
    started.notified().await;

    let impatient = tokio::time::timeout(Duration::from_millis(10), manager.wait(&id)).await;
    assert!(impatient.is_err());
    assert!(manager.is_running(&id));

    release.notify_one();
    let done = manager.wait(&id).await.unwrap();
    assert_eq!(done.status, ExecutionStatus::Completed);
    assert_eq!(done.results[0].result, Some(json!("released")));
}
