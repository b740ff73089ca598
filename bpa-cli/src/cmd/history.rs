use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, StoreArgs};

use super::config::open_store;

#[derive(Serialize)]
struct HistoryEntry {
    id: String,
    status: String,
    started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<String>,
    steps_succeeded: usize,
    steps_failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn history_cmd(scenario_id: &str, output: OutputArgs, store: StoreArgs) -> i32 {
    let Some(store) = open_store(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    let executions = match store.list_executions(scenario_id).await {
        Ok(v) => v,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to list executions: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let entries: Vec<HistoryEntry> = executions
        .iter()
        .map(|r| HistoryEntry {
            id: r.id.clone(),
            status: r.status.as_str().to_string(),
            started_at: r.started_at.to_rfc3339(),
            completed_at: r.completed_at.map(|t| t.to_rfc3339()),
            steps_succeeded: r.succeeded_steps(),
            steps_failed: r.failed_steps(),
            error: r.error.clone(),
        })
        .collect();

    if output.format == OutputFormat::Text && !output.quiet {
        if entries.is_empty() {
            println!("no executions for scenario {scenario_id}");
        }
        for e in &entries {
            print!("{}  {:<11}  {}  ✓{} ✗{}", e.id, e.status, e.started_at, e.steps_succeeded, e.steps_failed);
            if let Some(err) = &e.error {
                print!("  {err}");
            }
            println!();
        }
    } else {
        print_result(output.format, output.quiet, &entries);
    }
    exit_codes::SUCCESS
}
