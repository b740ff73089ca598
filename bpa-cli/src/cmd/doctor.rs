use std::path::Path;
use std::time::Duration;

use bpa_exec::executor::ExecutorConfig;
use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::utils::redact_url_password;
use crate::{EngineArgs, OutputArgs, StoreArgs};

use super::config::{build_executor_config, openai_api_key, webdriver_backend, MEMORY_STORE};

#[derive(Serialize)]
struct Check {
    name: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Check {
    fn new(name: &str, status: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: status.to_string(),
            message: Some(message.into()),
        }
    }
}

#[derive(Serialize)]
struct DoctorResult {
    checks: Vec<Check>,
    all_passed: bool,
}

pub async fn doctor_cmd(store: StoreArgs, engine: EngineArgs, output: OutputArgs) -> i32 {
    let checks = vec![
        check_database(&store).await,
        check_dir("templates", &engine.template_dir),
        check_dir("documents", &engine.document_dir),
        check_webdriver(&engine).await,
        check_ai(&engine),
    ];

    // Warnings describe optional backends; only errors fail the check run.
    let all_passed = checks.iter().all(|c| c.status != "error");
    let result = DoctorResult { checks, all_passed };

    if output.format == OutputFormat::Text && !output.quiet {
        println!("Environment checks:");
        for c in &result.checks {
            let icon = match c.status.as_str() {
                "ok" => "✓",
                "warning" => "!",
                _ => "✗",
            };
            print!("  {} {}: {}", icon, c.name, c.status);
            if let Some(msg) = &c.message {
                print!(" - {msg}");
            }
            println!();
        }
        if result.all_passed {
            println!("\nAll checks passed.");
        } else {
            println!("\nSome checks failed.");
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }

    if all_passed {
        exit_codes::SUCCESS
    } else {
        exit_codes::RUNTIME_ERROR
    }
}

async fn check_database(store: &StoreArgs) -> Check {
    let url = store
        .store
        .clone()
        .or_else(|| std::env::var("BPA_DATABASE_URL").ok())
        .or_else(|| std::env::var("DATABASE_URL").ok());

    match url {
        None => Check::new("database", "warning", "no database URL configured"),
        Some(url) if url == MEMORY_STORE => {
            Check::new("database", "ok", "in-memory store (records are not persisted)")
        }
        Some(url) => match bpa_store::PostgresStore::connect(&url, 1).await {
            Ok(pg) => {
                pg.close().await;
                Check::new("database", "ok", format!("connected to {}", redact_url_password(&url)))
            }
            Err(e) => Check::new("database", "error", format!("connection failed: {e}")),
        },
    }
}

fn check_dir(name: &str, path: &Path) -> Check {
    if path.is_dir() {
        Check::new(name, "ok", path.display().to_string())
    } else {
        Check::new(name, "warning", format!("directory not found: {}", path.display()))
    }
}

async fn check_webdriver(engine: &EngineArgs) -> Check {
    let config = ExecutorConfig {
        browser_timeout: Duration::from_secs(5),
        ..build_executor_config(engine)
    };
    let backend = match webdriver_backend(engine, &config) {
        Ok(b) => b,
        Err(e) => return Check::new("webdriver", "error", e),
    };
    match backend.status().await {
        Ok(message) => Check::new("webdriver", "ok", message),
        Err(e) => Check::new("webdriver", "warning", format!("web steps will fail: {e}")),
    }
}

fn check_ai(engine: &EngineArgs) -> Check {
    match openai_api_key() {
        Some(_) => Check::new("ai", "ok", format!("model {}", engine.ai_model)),
        None => Check::new("ai", "warning", "OPENAI_API_KEY not set; AI steps will fail"),
    }
}
