use bpa_core::{ExecutionResult, StepStatus};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_result<T: Serialize>(format: OutputFormat, quiet: bool, result: &T) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{json}");
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(result) {
                println!("{json}");
            }
        }
    }
}

pub fn print_error(format: OutputFormat, quiet: bool, message: &str) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => eprintln!("error: {message}"),
        OutputFormat::Json => {
            let err = serde_json::json!({"error": message});
            eprintln!("{}", serde_json::to_string(&err).unwrap_or_default());
        }
    }
}

/// Human summary of an execution in text mode, the full record otherwise.
pub fn print_execution(format: OutputFormat, quiet: bool, result: &ExecutionResult) {
    if quiet {
        return;
    }
    if format == OutputFormat::Json {
        print_result(format, quiet, result);
        return;
    }

    println!("execution {}", result.id);
    println!("  scenario: {}", result.scenario_id);
    println!("  status:   {}", result.status.as_str());
    println!("  started:  {}", result.started_at.to_rfc3339());
    if let Some(done) = result.completed_at {
        println!("  finished: {}", done.to_rfc3339());
    }
    for step in &result.results {
        match step.status {
            StepStatus::Success => println!("  ✓ step {} ({})", step.order, step.kind),
            StepStatus::Error => println!(
                "  ✗ step {} ({}): {}",
                step.order,
                step.kind,
                step.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    if let Some(error) = &result.error {
        println!("  error:    {error}");
    }
}
