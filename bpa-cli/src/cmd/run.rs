use std::path::Path;
use std::sync::Arc;

use bpa_core::{validate_draft, ExecutionStatus, Scenario};
use bpa_exec::executor::{
    CompositeEventSink, EventSink, RunManager, ScenarioRunner, StdoutEventSink, TracingEventSink,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::exit_codes;
use crate::output::{print_error, print_execution, OutputFormat};
use crate::{EngineArgs, OutputArgs, StoreArgs};

use super::config::{build_dispatcher, build_executor_config, load_draft, open_stores};
use super::progress::ProgressEventSink;

/// Owner recorded on scenarios created implicitly by `run --file`.
const FILE_RUN_OWNER: &str = "cli";

pub async fn run_cmd(
    scenario_id: Option<&str>,
    file: Option<&Path>,
    events: bool,
    output: OutputArgs,
    store: StoreArgs,
    engine: EngineArgs,
) -> i32 {
    // Parse the file before touching the store so a bad document fails fast.
    let draft = match file {
        Some(path) => match load_draft(path) {
            Ok(d) => Some(d),
            Err(e) => {
                print_error(output.format, output.quiet, &e.to_string());
                return exit_codes::VALIDATION_FAILED;
            }
        },
        None => None,
    };
    if let Some(draft) = &draft {
        if let Err(e) = validate_draft(draft) {
            let details: Vec<String> = e
                .violations
                .iter()
                .map(|v| format!("{}: {}", v.path, v.message))
                .collect();
            print_error(
                output.format,
                output.quiet,
                &format!("validation failed: {}", details.join("; ")),
            );
            return exit_codes::VALIDATION_FAILED;
        }
    }

    let Some(stores) = open_stores(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    let store = stores.scenarios;

    let scenario_id = match (draft, scenario_id) {
        (Some(draft), _) => {
            let scenario = Scenario::from_draft(draft, FILE_RUN_OWNER, Utc::now());
            if let Err(e) = store.create_scenario(&scenario).await {
                print_error(output.format, output.quiet, &format!("failed to save scenario: {e}"));
                return exit_codes::RUNTIME_ERROR;
            }
            scenario.id
        }
        (None, Some(id)) => id.to_string(),
        (None, None) => {
            print_error(output.format, output.quiet, "either a scenario id or --file is required");
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let interactive = output.format == OutputFormat::Text && !output.quiet;
    let mut sinks = CompositeEventSink::new();
    sinks.add(Box::new(TracingEventSink));
    if events {
        sinks.add(Box::new(StdoutEventSink));
    }
    if interactive && !events {
        sinks.add(Box::new(ProgressEventSink::new()));
    }
    let event_sink: Arc<dyn EventSink> = Arc::new(sinks);

    let config = build_executor_config(&engine);
    let dispatcher = Arc::new(build_dispatcher(&engine, &config, stores.variables));
    let runner = Arc::new(ScenarioRunner::new(config, store, dispatcher, event_sink));
    let manager = RunManager::new(runner);

    let execution_id = manager.trigger(&scenario_id);
    if interactive {
        eprintln!("execution {execution_id} started (Ctrl-C to cancel)");
    }

    let outcome = tokio::select! {
        outcome = manager.wait(&execution_id) => outcome,
        _ = tokio::signal::ctrl_c() => {
            warn!(%execution_id, "interrupt received, canceling run");
            manager.cancel(&execution_id);
            manager.wait(&execution_id).await
        }
    };

    let result = match outcome {
        Ok(r) => r,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("run did not complete: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };
    info!(%execution_id, status = result.status.as_str(), "run finished");

    print_execution(output.format, output.quiet, &result);
    match result.status {
        ExecutionStatus::Completed => exit_codes::SUCCESS,
        _ => exit_codes::RUN_FAILED,
    }
}
