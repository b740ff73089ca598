use assert_cmd::Command;
use serde_json::Value;

fn bpa() -> Command {
    let mut cmd = Command::cargo_bin("bpa").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn create_variable_prints_the_record() {
    let out = bpa()
        .args(["variable", "create", "company", "Acme", "--description", "legal name"])
        .args(["--store", "memory", "--format", "json"])
        .assert()
        .success();
    let v = stdout_json(out.get_output());

    assert_eq!(v["name"], "company");
    assert_eq!(v["value"], "Acme");
    assert_eq!(v["description"], "legal name");
    assert_eq!(v["created_at"], v["updated_at"]);
}

#[test]
fn variable_names_must_be_identifiers() {
    let out = bpa()
        .args(["variable", "create", "company-name", "Acme"])
        .args(["--store", "memory", "--format", "json"])
        .assert()
        .code(2);
    let v = stdout_json(out.get_output());

    assert_eq!(v["valid"], false);
    assert_eq!(v["errors"][0]["path"], "$.name");
}

#[test]
fn empty_store_lists_no_variables() {
    let out = bpa()
        .args(["variable", "list", "--store", "memory", "--format", "json"])
        .assert()
        .success();
    assert_eq!(stdout_json(out.get_output()), serde_json::json!([]));
}

#[test]
fn update_without_fields_is_rejected() {
    bpa()
        .args(["variable", "update", "company", "--store", "memory"])
        .assert()
        .code(2);
}

#[test]
fn missing_variable_is_reported() {
    for action in ["show", "delete"] {
        bpa()
            .args(["variable", action, "company", "--store", "memory"])
            .assert()
            .code(4);
    }
}
