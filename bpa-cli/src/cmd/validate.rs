use std::path::Path;

use bpa_core::{validate_draft, ParseError};
use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::OutputArgs;

use super::config::{load_draft, LoadError};

#[derive(Serialize)]
struct ValidateResult {
    valid: bool,
    name: String,
    steps: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

pub async fn validate_cmd(path: &Path, output: OutputArgs) -> i32 {
    let draft = match load_draft(path) {
        Ok(d) => d,
        Err(LoadError::Read { path, message }) => {
            print_error(output.format, output.quiet, &format!("failed to read {path}: {message}"));
            return exit_codes::RUNTIME_ERROR;
        }
        Err(LoadError::Parse(e @ ParseError::Text { .. })) => {
            print_error(output.format, output.quiet, &format!("text parse failed: {e}"));
            return exit_codes::VALIDATION_FAILED;
        }
        Err(LoadError::Parse(e)) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let errors: Vec<String> = match validate_draft(&draft) {
        Ok(()) => Vec::new(),
        Err(err) => err
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.path, v.message))
            .collect(),
    };
    let result = ValidateResult {
        valid: errors.is_empty(),
        name: draft.name.clone(),
        steps: draft.steps.len(),
        errors,
    };

    if output.format == OutputFormat::Text && !output.quiet {
        if result.valid {
            println!("ok: valid scenario `{}` ({} steps)", result.name, result.steps);
        } else {
            eprintln!("error: validation failed");
            for e in &result.errors {
                eprintln!("- {e}");
            }
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }

    if result.valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::VALIDATION_FAILED
    }
}
