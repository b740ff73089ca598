use std::path::Path;

use bpa_core::{
    parse_patch_str, parse_scenario_text, validate_draft, DocumentFormat, Scenario, ScenarioDraft,
    Validate, ValidationError,
};
use bpa_exec::document::{AutoExtractor, DocumentBackend};
use bpa_store::{ScenarioStore, StoreError};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, StoreArgs};

use super::config::{load_draft, open_store};

#[derive(Serialize)]
struct ScenarioSummary {
    id: String,
    name: String,
    status: String,
    steps: usize,
    created_at: String,
}

impl From<&Scenario> for ScenarioSummary {
    fn from(s: &Scenario) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            status: s.status.as_str().to_string(),
            steps: s.steps.len(),
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct DeleteResult {
    id: String,
    deleted: bool,
}

pub async fn create_cmd(path: &Path, owner: &str, output: OutputArgs, store: StoreArgs) -> i32 {
    let draft = match load_draft(path) {
        Ok(d) => d,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };
    save_draft(draft, owner, output, store).await
}

/// Extract text from a document and create a scenario from its
/// `Scenario name:` / `Steps:` layout.
pub async fn import_cmd(document: &Path, owner: &str, output: OutputArgs, store: StoreArgs) -> i32 {
    let bytes = match tokio::fs::read(document).await {
        Ok(b) => b,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to read {}: {e}", document.display()),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let text = match AutoExtractor.extract_text(&bytes).await {
        Ok(t) => t,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("{}: {e}", document.display()));
            return exit_codes::VALIDATION_FAILED;
        }
    };
    let draft = match parse_scenario_text(&text) {
        Ok(d) => d,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("{}: {e}", document.display()));
            return exit_codes::VALIDATION_FAILED;
        }
    };
    save_draft(draft, owner, output, store).await
}

async fn save_draft(draft: ScenarioDraft, owner: &str, output: OutputArgs, store: StoreArgs) -> i32 {
    if let Err(e) = validate_draft(&draft) {
        report_violations(&output, &e);
        return exit_codes::VALIDATION_FAILED;
    }

    let Some(store) = open_store(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };

    let scenario = Scenario::from_draft(draft, owner, Utc::now());
    if let Err(e) = store.create_scenario(&scenario).await {
        print_error(output.format, output.quiet, &format!("failed to save scenario: {e}"));
        return exit_codes::RUNTIME_ERROR;
    }
    info!(scenario_id = %scenario.id, "scenario created");

    if output.format == OutputFormat::Text && !output.quiet {
        println!("ok: created scenario {} ({})", scenario.id, scenario.name);
    } else {
        print_result(output.format, output.quiet, &scenario);
    }
    exit_codes::SUCCESS
}

pub async fn list_cmd(output: OutputArgs, store: StoreArgs) -> i32 {
    let Some(store) = open_store(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    let scenarios = match store.list_scenarios().await {
        Ok(s) => s,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to list scenarios: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let summaries: Vec<ScenarioSummary> = scenarios.iter().map(ScenarioSummary::from).collect();

    if output.format == OutputFormat::Text && !output.quiet {
        if summaries.is_empty() {
            println!("no scenarios");
        }
        for s in &summaries {
            println!("{}  {:<8}  {:>3} steps  {}", s.id, s.status, s.steps, s.name);
        }
    } else {
        print_result(output.format, output.quiet, &summaries);
    }
    exit_codes::SUCCESS
}

pub async fn show_cmd(id: &str, output: OutputArgs, store: StoreArgs) -> i32 {
    let Some(store) = open_store(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    match fetch(store.as_ref(), id, &output).await {
        Ok(scenario) => {
            print_result(output.format, output.quiet, &scenario);
            exit_codes::SUCCESS
        }
        Err(code) => code,
    }
}

pub async fn update_cmd(id: &str, patch_path: &Path, output: OutputArgs, store: StoreArgs) -> i32 {
    let content = match std::fs::read_to_string(patch_path) {
        Ok(c) => c,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to read {}: {e}", patch_path.display()),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let patch = match parse_patch_str(&content, DocumentFormat::Auto) {
        Ok(p) => p,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };
    if let Err(e) = patch.validate() {
        report_violations(&output, &e);
        return exit_codes::VALIDATION_FAILED;
    }

    let Some(store) = open_store(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    let mut scenario = match fetch(store.as_ref(), id, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    scenario.apply(patch, Utc::now());
    if let Err(e) = scenario.validate() {
        report_violations(&output, &e);
        return exit_codes::VALIDATION_FAILED;
    }

    match store.update_scenario(&scenario).await {
        Ok(()) => {
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: updated scenario {}", scenario.id);
            } else {
                print_result(output.format, output.quiet, &scenario);
            }
            exit_codes::SUCCESS
        }
        Err(StoreError::NotFound(_)) => {
            print_error(output.format, output.quiet, &format!("scenario not found: {id}"));
            exit_codes::RUNTIME_ERROR
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to update scenario: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}

pub async fn delete_cmd(id: &str, output: OutputArgs, store: StoreArgs) -> i32 {
    let Some(store) = open_store(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    match store.delete_scenario(id).await {
        Ok(true) => {
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: deleted scenario {id}");
            } else {
                print_result(output.format, output.quiet, &DeleteResult { id: id.to_string(), deleted: true });
            }
            exit_codes::SUCCESS
        }
        Ok(false) => {
            print_error(output.format, output.quiet, &format!("scenario not found: {id}"));
            exit_codes::RUNTIME_ERROR
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to delete scenario: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}

async fn fetch(store: &dyn ScenarioStore, id: &str, output: &OutputArgs) -> Result<Scenario, i32> {
    match store.get_scenario(id).await {
        Ok(Some(s)) => Ok(s),
        Ok(None) => {
            print_error(output.format, output.quiet, &format!("scenario not found: {id}"));
            Err(exit_codes::RUNTIME_ERROR)
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to load scenario: {e}"));
            Err(exit_codes::RUNTIME_ERROR)
        }
    }
}

pub(super) fn report_violations(output: &OutputArgs, err: &ValidationError) {
    if output.format == OutputFormat::Text {
        if !output.quiet {
            eprintln!("error: validation failed");
            for v in &err.violations {
                eprintln!("- {}: {}", v.path, v.message);
            }
        }
    } else {
        print_result(output.format, output.quiet, &serde_json::json!({
            "valid": false,
            "errors": err.violations,
        }));
    }
}
