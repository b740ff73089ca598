use assert_cmd::Command;
use tempfile::NamedTempFile;

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(suffix).tempfile().expect("tempfile");
    std::io::Write::write_all(&mut f, contents.as_bytes()).expect("write");
    f
}

fn bpa() -> Command {
    Command::cargo_bin("bpa").unwrap()
}

#[test]
fn validate_command_returns_0_for_valid_scenario() {
    let doc = r##"
name: Onboard customer
steps:
  - kind: template
    order: 1
    details: { name: welcome, bindings: { user: Alice } }
  - kind: web
    order: 2
    details:
      url: https://crm.example/new
      actions:
        - { type: fill, selector: "#name", value: Alice }
        - { type: submit, selector: "#form" }
"##;
    let f = write_temp(".yaml", doc);

    let out = bpa()
        .args(["validate", f.path().to_str().unwrap()])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&out.get_output().stdout).to_string();
    assert!(stdout.contains("valid scenario `Onboard customer` (2 steps)"), "{stdout}");
}

#[test]
fn validate_command_reports_duplicate_orders() {
    let doc = r#"{
  "name": "Dup",
  "steps": [
    {"kind": "template", "order": 1, "details": {"name": "a"}},
    {"kind": "template", "order": 1, "details": {"name": "b"}}
  ]
}"#;
    let f = write_temp(".json", doc);

    let out = bpa()
        .args(["validate", "--format", "json", f.path().to_str().unwrap()])
        .assert()
        .code(2);
    let v: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(v["valid"], false);
    assert!(v["errors"][0]
        .as_str()
        .unwrap()
        .contains("order 1 is already used by $.steps[0]"));
}

#[test]
fn validate_command_rejects_unparseable_document() {
    let f = write_temp(".yaml", "steps: [unclosed");

    bpa()
        .args(["validate", f.path().to_str().unwrap()])
        .assert()
        .code(2);
}

#[test]
fn validate_command_reads_text_layout() {
    let doc = "Scenario name: Invoice run\nSteps:\n1. template: {\"name\": \"invoice\"}\n2. pdf: {\"document\": \"in/order.txt\"}\n";
    let f = write_temp(".txt", doc);

    bpa()
        .args(["validate", f.path().to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn validate_command_fails_on_missing_file() {
    bpa()
        .args(["validate", "/nonexistent/scenario.yaml"])
        .assert()
        .code(4);
}
