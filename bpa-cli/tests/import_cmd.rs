mod common;

use assert_cmd::Command;
use serde_json::Value;

fn import(path: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("bpa").unwrap();
    cmd.env_remove("RUST_LOG")
        .args(["scenario", "import"])
        .arg(path)
        .args(["--store", "memory", "--format", "json"]);
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn pdf_without_layout_imports_as_unnamed_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memo.pdf");
    std::fs::write(&path, common::pdf_with_text("Order 42")).unwrap();

    let out = import(&path).assert().success();
    let v = stdout_json(out.get_output());

    assert_eq!(v["name"], "Unnamed Scenario");
    assert_eq!(v["steps"], serde_json::json!([]));
}

#[test]
fn text_layout_imports_steps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("onboarding.txt");
    std::fs::write(
        &path,
        "Scenario name: Onboarding\nSteps:\n1. template: {\"name\": \"welcome\"}\n",
    )
    .unwrap();

    let out = import(&path).assert().success();
    let v = stdout_json(out.get_output());

    assert_eq!(v["name"], "Onboarding");
    assert_eq!(v["steps"][0]["kind"], "template");
}

#[test]
fn corrupt_pdf_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.pdf");
    std::fs::write(&path, b"%PDF-1.7\n\x00\x01binary").unwrap();

    import(&path).assert().code(2);
}
