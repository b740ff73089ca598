mod common;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A workspace with a templates directory and a scenario file.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("templates")).unwrap();
        std::fs::write(dir.path().join("templates/welcome.txt"), "Hello {{ user }}").unwrap();
        Self { dir }
    }

    fn scenario(&self, body: &str) -> String {
        let path = self.dir.path().join("scenario.json");
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().to_string()
    }

    fn run(&self, file: &str) -> Command {
        let mut cmd = Command::cargo_bin("bpa").unwrap();
        cmd.env_remove("OPENAI_API_KEY")
            .env_remove("BPA_WEBDRIVER_CAPABILITIES")
            .env_remove("RUST_LOG")
            .args(["run", "--store", "memory", "--format", "json", "--file", file])
            .arg("--template-dir")
            .arg(self.dir.path().join("templates"))
            .arg("--document-dir")
            .arg(self.dir.path());
        cmd
    }
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn run_file_completes_template_scenario() {
    let fx = Fixture::new();
    let file = fx.scenario(
        r#"{"name": "Greet", "steps": [
            {"kind": "template", "order": 1, "details": {"name": "welcome", "bindings": {"user": "Alice"}}}
        ]}"#,
    );

    let out = fx.run(&file).assert().success();
    let v = stdout_json(out.get_output());

    assert_eq!(v["status"], "completed");
    assert_eq!(v["results"][0]["status"], "success");
    assert_eq!(v["results"][0]["result"], "Hello Alice");
    assert!(v["completed_at"].is_string());
}

#[test]
fn run_file_with_no_steps_completes() {
    let fx = Fixture::new();
    let file = fx.scenario(r#"{"name": "Empty", "steps": []}"#);

    let out = fx.run(&file).assert().success();
    let v = stdout_json(out.get_output());

    assert_eq!(v["status"], "completed");
    assert_eq!(v["results"], serde_json::json!([]));
}

#[test]
fn unsupported_kind_fails_the_run_and_stops() {
    let fx = Fixture::new();
    let file = fx.scenario(
        r#"{"name": "Fax", "steps": [
            {"kind": "email", "order": 1, "details": {}},
            {"kind": "template", "order": 2, "details": {"name": "welcome", "bindings": {"user": "Bob"}}}
        ]}"#,
    );

    let out = fx.run(&file).assert().code(3);
    let v = stdout_json(out.get_output());

    assert_eq!(v["status"], "failed");
    assert_eq!(v["results"].as_array().unwrap().len(), 1);
    assert_eq!(v["results"][0]["error"], "unsupported step kind: email");
}

#[test]
fn ai_step_without_api_key_fails_with_configuration_error() {
    let fx = Fixture::new();
    let file = fx.scenario(
        r#"{"name": "Ask", "steps": [
            {"kind": "ai", "order": 1, "details": {"description": "summarize"}}
        ]}"#,
    );

    let out = fx.run(&file).assert().code(3);
    let v = stdout_json(out.get_output());

    assert!(v["results"][0]["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
}

#[test]
fn document_step_reads_from_document_dir() {
    let fx = Fixture::new();
    std::fs::write(fx.dir.path().join("order.txt"), "Order 42\n").unwrap();
    let file = fx.scenario(
        r#"{"name": "Read", "steps": [{"kind": "pdf", "order": 1, "details": {"document": "order.txt"}}]}"#,
    );

    let out = fx.run(&file).assert().success();
    assert_eq!(stdout_json(out.get_output())["results"][0]["result"], "Order 42\n");
}

#[test]
fn document_step_reads_pdf_documents() {
    let fx = Fixture::new();
    std::fs::write(fx.dir.path().join("order.pdf"), common::pdf_with_text("Order 42")).unwrap();
    let file = fx.scenario(
        r#"{"name": "Read", "steps": [{"kind": "pdf", "order": 1, "details": {"document": "order.pdf"}}]}"#,
    );

    let out = fx.run(&file).assert().success();
    let v = stdout_json(out.get_output());
    assert!(v["results"][0]["result"].as_str().unwrap().contains("Order 42"));
}

#[test]
fn template_conditionals_and_escaping_apply() {
    let fx = Fixture::new();
    std::fs::write(
        fx.dir.path().join("templates/letter.txt"),
        "{% if vip %}Dear VIP {% endif %}Hello {{ user }}",
    )
    .unwrap();
    let file = fx.scenario(
        r#"{"name": "Letters", "steps": [
            {"kind": "template", "order": 1, "details": {"name": "letter", "bindings": {"vip": false, "user": "Alice"}}},
            {"kind": "template", "order": 2, "details": {"name": "letter", "bindings": {"vip": true, "user": "<Bob>"}}}
        ]}"#,
    );

    let out = fx.run(&file).assert().success();
    let v = stdout_json(out.get_output());

    assert_eq!(v["results"][0]["result"], "Hello Alice");
    assert_eq!(v["results"][1]["result"], "Dear VIP Hello &lt;Bob&gt;");
}

#[test]
fn malformed_webdriver_capabilities_fail_web_steps() {
    let fx = Fixture::new();
    let file = fx.scenario(
        r#"{"name": "Browse", "steps": [{"kind": "web", "order": 1, "details": {"url": "https://example.test"}}]}"#,
    );

    let out = fx
        .run(&file)
        .args(["--webdriver-capabilities", "{not json"])
        .assert()
        .code(3);
    let error = stdout_json(out.get_output())["results"][0]["error"]
        .as_str()
        .unwrap()
        .to_string();

    assert!(error.starts_with("web automation unavailable: "), "{error}");
    assert!(error.contains("--webdriver-capabilities"), "{error}");
}

#[test]
fn unknown_scenario_id_is_an_errored_run() {
    let out = Command::cargo_bin("bpa")
        .unwrap()
        .args(["run", "missing-scenario", "--store", "memory", "--format", "json"])
        .assert()
        .code(3);
    let v = stdout_json(out.get_output());

    assert_eq!(v["status"], "error");
    assert_eq!(v["scenario_id"], "missing-scenario");
}

#[test]
fn invalid_file_is_rejected_before_running() {
    let fx = Fixture::new();
    let file = fx.scenario(r#"{"name": "", "steps": []}"#);

    fx.run(&file).assert().code(2);
}

#[test]
fn commands_need_a_store() {
    Command::cargo_bin("bpa")
        .unwrap()
        .env_remove("BPA_DATABASE_URL")
        .env_remove("DATABASE_URL")
        .args(["scenario", "list"])
        .assert()
        .code(4);
}

#[test]
fn memory_store_cannot_be_migrated() {
    Command::cargo_bin("bpa")
        .unwrap()
        .args(["migrate", "--store", "memory"])
        .assert()
        .code(4);
}
