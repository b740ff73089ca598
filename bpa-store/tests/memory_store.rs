use bpa_core::{
    ExecutionRecord, ExecutionStatus, Scenario, ScenarioDraft, ScenarioPatch, ScenarioStatus, Step,
    StepKind, StepResult, Variable, VariablePatch,
};
use bpa_store::{MemoryStore, ScenarioStore, StoreError, VariableStore};
use chrono::{Duration, Utc};
use serde_json::json;

fn scenario(name: &str) -> Scenario {
    let draft = ScenarioDraft {
        name: name.to_string(),
        description: None,
        steps: vec![Step::new(StepKind::Template, json!({"name": "welcome"}), 1)],
        tags: vec![],
    };
    Scenario::from_draft(draft, "tester", Utc::now())
}

#[tokio::test]
async fn create_then_get_returns_scenario() {
    let store = MemoryStore::new();
    let s = scenario("onboarding");
    store.create_scenario(&s).await.unwrap();

    let got = store.get_scenario(&s.id).await.unwrap();
    assert_eq!(got, Some(s));
    assert_eq!(store.get_scenario("missing").await.unwrap(), None);
}

#[tokio::test]
async fn creating_same_id_twice_conflicts() {
    let store = MemoryStore::new();
    let s = scenario("a");
    store.create_scenario(&s).await.unwrap();
    assert!(matches!(
        store.create_scenario(&s).await,
        Err(StoreError::Conflict(_))
    ));
}

#[tokio::test]
async fn update_requires_existing_scenario() {
    let store = MemoryStore::new();
    let mut s = scenario("a");
    assert!(matches!(
        store.update_scenario(&s).await,
        Err(StoreError::NotFound(_))
    ));

    store.create_scenario(&s).await.unwrap();
    s.apply(
        ScenarioPatch {
            status: Some(ScenarioStatus::Active),
            ..Default::default()
        },
        Utc::now(),
    );
    store.update_scenario(&s).await.unwrap();
    let got = store.get_scenario(&s.id).await.unwrap().unwrap();
    assert_eq!(got.status, ScenarioStatus::Active);
    assert!(got.updated_at.is_some());
}

#[tokio::test]
async fn delete_reports_whether_anything_was_removed() {
    let store = MemoryStore::new();
    let s = scenario("a");
    store.create_scenario(&s).await.unwrap();
    assert!(store.delete_scenario(&s.id).await.unwrap());
    assert!(!store.delete_scenario(&s.id).await.unwrap());
}

#[tokio::test]
async fn executions_are_write_once_and_reads_are_stable() {
    let store = MemoryStore::new();
    let mut rec = ExecutionRecord::begin("exec-1", "scn-1");
    rec.push(StepResult::success(StepKind::Template, 1, json!("Hello Alice")));
    let done = rec.finish(ExecutionStatus::Completed, None);

    store.save_execution(&done).await.unwrap();
    assert!(matches!(
        store.save_execution(&done).await,
        Err(StoreError::Conflict(_))
    ));

    let first = store.get_execution("exec-1").await.unwrap();
    let second = store.get_execution("exec-1").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Some(done));
}

#[tokio::test]
async fn list_executions_is_most_recent_first() {
    let store = MemoryStore::new();
    let base = Utc::now();
    for (i, id) in ["old", "mid", "new"].iter().enumerate() {
        let mut r = ExecutionRecord::begin(*id, "scn").finish(ExecutionStatus::Completed, None);
        r.started_at = base + Duration::seconds(i as i64);
        store.save_execution(&r).await.unwrap();
    }
    let other = ExecutionRecord::begin("elsewhere", "other").finish(ExecutionStatus::Failed, None);
    store.save_execution(&other).await.unwrap();

    let ids: Vec<String> = store
        .list_executions("scn")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn variables_are_keyed_by_name() {
    let store = MemoryStore::new();
    let var = Variable::new("company", "Acme", Some("legal name".into()), Utc::now());
    store.create_variable(&var).await.unwrap();

    assert_eq!(store.get_variable("company").await.unwrap(), Some(var.clone()));
    assert_eq!(store.get_variable("Company").await.unwrap(), None);

    let dup = Variable::new("company", "Other", None, Utc::now());
    assert!(matches!(
        store.create_variable(&dup).await,
        Err(StoreError::Conflict(name)) if name == "company"
    ));
}

#[tokio::test]
async fn list_variables_is_newest_first() {
    let store = MemoryStore::new();
    let base = Utc::now();
    for (name, age) in [("old", 10), ("new", 0), ("mid", 5)] {
        let v = Variable::new(name, "x", None, base - Duration::seconds(age));
        store.create_variable(&v).await.unwrap();
    }
    let names: Vec<String> = store
        .list_variables()
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.name)
        .collect();
    assert_eq!(names, ["new", "mid", "old"]);
}

#[tokio::test]
async fn update_and_delete_variable() {
    let store = MemoryStore::new();
    let mut var = Variable::new("greeting", "Hi", None, Utc::now());
    assert!(matches!(
        store.update_variable(&var).await,
        Err(StoreError::NotFound(_))
    ));

    store.create_variable(&var).await.unwrap();
    var.apply(
        VariablePatch {
            value: Some("Hello".into()),
            description: None,
        },
        Utc::now(),
    );
    store.update_variable(&var).await.unwrap();
    let got = store.get_variable("greeting").await.unwrap().unwrap();
    assert_eq!(got.value, "Hello");

    assert!(store.delete_variable("greeting").await.unwrap());
    assert!(!store.delete_variable("greeting").await.unwrap());
    assert!(store.list_variables().await.unwrap().is_empty());
}
