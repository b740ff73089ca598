use std::sync::Arc;

use bpa_core::{Validate, Variable, VariablePatch};
use bpa_store::{StoreError, VariableStore};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, StoreArgs};

use super::config::open_stores;
use super::scenario::report_violations;

#[derive(Serialize)]
struct DeleteResult {
    name: String,
    deleted: bool,
}

async fn open(store: StoreArgs, output: &OutputArgs) -> Option<Arc<dyn VariableStore>> {
    open_stores(store, output).await.map(|s| s.variables)
}

pub async fn create_cmd(
    name: &str,
    value: &str,
    description: Option<String>,
    output: OutputArgs,
    store: StoreArgs,
) -> i32 {
    let variable = Variable::new(name, value, description, Utc::now());
    if let Err(e) = variable.validate() {
        report_violations(&output, &e);
        return exit_codes::VALIDATION_FAILED;
    }

    let Some(store) = open(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    match store.create_variable(&variable).await {
        Ok(()) => {
            info!(name, "variable created");
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: created variable {name}");
            } else {
                print_result(output.format, output.quiet, &variable);
            }
            exit_codes::SUCCESS
        }
        Err(StoreError::Conflict(_)) => {
            print_error(output.format, output.quiet, &format!("variable already exists: {name}"));
            exit_codes::RUNTIME_ERROR
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to save variable: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}

pub async fn list_cmd(output: OutputArgs, store: StoreArgs) -> i32 {
    let Some(store) = open(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    let variables = match store.list_variables().await {
        Ok(v) => v,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to list variables: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    if output.format == OutputFormat::Text && !output.quiet {
        if variables.is_empty() {
            println!("no variables");
        }
        for v in &variables {
            println!("{} = {}", v.name, v.value);
        }
    } else {
        print_result(output.format, output.quiet, &variables);
    }
    exit_codes::SUCCESS
}

pub async fn show_cmd(name: &str, output: OutputArgs, store: StoreArgs) -> i32 {
    let Some(store) = open(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    match fetch(store.as_ref(), name, &output).await {
        Ok(variable) => {
            print_result(output.format, output.quiet, &variable);
            exit_codes::SUCCESS
        }
        Err(code) => code,
    }
}

pub async fn update_cmd(
    name: &str,
    patch: VariablePatch,
    output: OutputArgs,
    store: StoreArgs,
) -> i32 {
    if patch == VariablePatch::default() {
        print_error(output.format, output.quiet, "nothing to update: pass --value or --description");
        return exit_codes::VALIDATION_FAILED;
    }

    let Some(store) = open(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    let mut variable = match fetch(store.as_ref(), name, &output).await {
        Ok(v) => v,
        Err(code) => return code,
    };
    variable.apply(patch, Utc::now());

    match store.update_variable(&variable).await {
        Ok(()) => {
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: updated variable {name}");
            } else {
                print_result(output.format, output.quiet, &variable);
            }
            exit_codes::SUCCESS
        }
        Err(StoreError::NotFound(_)) => {
            print_error(output.format, output.quiet, &format!("variable not found: {name}"));
            exit_codes::RUNTIME_ERROR
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to update variable: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}

pub async fn delete_cmd(name: &str, output: OutputArgs, store: StoreArgs) -> i32 {
    let Some(store) = open(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    match store.delete_variable(name).await {
        Ok(true) => {
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: deleted variable {name}");
            } else {
                print_result(
                    output.format,
                    output.quiet,
                    &DeleteResult { name: name.to_string(), deleted: true },
                );
            }
            exit_codes::SUCCESS
        }
        Ok(false) => {
            print_error(output.format, output.quiet, &format!("variable not found: {name}"));
            exit_codes::RUNTIME_ERROR
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to delete variable: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}

async fn fetch(store: &dyn VariableStore, name: &str, output: &OutputArgs) -> Result<Variable, i32> {
    match store.get_variable(name).await {
        Ok(Some(v)) => Ok(v),
        Ok(None) => {
            print_error(output.format, output.quiet, &format!("variable not found: {name}"));
            Err(exit_codes::RUNTIME_ERROR)
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to load variable: {e}"));
            Err(exit_codes::RUNTIME_ERROR)
        }
    }
}
