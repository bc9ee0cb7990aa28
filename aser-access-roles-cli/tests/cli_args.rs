use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const CONFIG: &str = r#"{
    "principalAccountId": "111122223333",
    "principalRoleName": "ConsoleAuthRole",
    "externalId": "ext-123"
}"#;

const EXPORTS: &str = r#"{"Exports": [
    {"Name": "aser:orders:createOrder:function:arn", "Value": "arn:aws:lambda:us-east-1:123456789012:function:createOrder"},
    {"Name": "aser:orders:createOrder:function:description", "Value": "Creates an order"},
    {"Name": "aser:orders:checkout:stateMachine:arn", "Value": "arn:aws:states:us-east-1:123456789012:stateMachine:Checkout"},
    {"Name": "sls-orders-dev-ServiceEndpoint", "Value": "https://example.com"}
]}"#;

const TEMPLATE: &str = r#"{
    "AWSTemplateFormatVersion": "2010-09-09",
    "Resources": {"ServerlessDeploymentBucket": {"Type": "AWS::S3::Bucket"}}
}"#;

const OUTPUTS: &str = r#"[
    {"OutputKey": "OrdersCreateOrderFunctionAccessRoleArn", "OutputValue": "arn:aws:iam::123456789012:role/orders-createOrder"},
    {"OutputKey": "OrdersCheckoutStateMachineAccessRoleArn", "OutputValue": "arn:aws:iam::123456789012:role/orders-checkout"}
]"#;

fn workspace() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    fs::write(dir.path().join("config.json"), CONFIG).unwrap();
    fs::write(dir.path().join("exports.json"), EXPORTS).unwrap();
    fs::write(dir.path().join("template.json"), TEMPLATE).unwrap();
    fs::write(dir.path().join("outputs.json"), OUTPUTS).unwrap();
    dir
}

/// `aser-access-roles <subcommand>` with offline exports and the test configuration.
fn offline(dir: &Path, subcommand: &str) -> Command {
    let mut cmd = Command::cargo_bin("aser-access-roles").unwrap();
    cmd.env_remove("ASER_CONFIG")
        .env_remove("ASER_SERVICE")
        .env_remove("ASER_STAGE")
        .arg(subcommand)
        .arg("--config")
        .arg(dir.join("config.json"))
        .args(["--service", "orders"])
        .arg("--service-dir")
        .arg(dir)
        .arg("--exports-file")
        .arg(dir.join("exports.json"));
    cmd
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("aser-access-roles")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn plan_prints_generated_roles() {
    let dir = workspace();
    let output = offline(dir.path(), "plan").output().expect("failed to run plan");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let plan: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(plan["Resources"]["OrdersCreateOrderFunctionAccessRole"].is_object());
    assert!(plan["Resources"]["OrdersCheckoutStateMachineAccessRole"].is_object());
    assert_eq!(
        plan["Outputs"]["OrdersCreateOrderFunctionAccessRoleArn"]["Value"]["Fn::GetAtt"][0],
        "OrdersCreateOrderFunctionAccessRole"
    );
}

#[test]
fn generate_extends_template_in_place() {
    let dir = workspace();
    let template_path = dir.path().join("template.json");

    offline(dir.path(), "generate")
        .arg("--template")
        .arg(&template_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 2 access roles"));

    let template = read_json(&template_path);
    assert_eq!(template["AWSTemplateFormatVersion"], "2010-09-09");
    assert!(template["Resources"]["ServerlessDeploymentBucket"].is_object());
    let role = &template["Resources"]["OrdersCreateOrderFunctionAccessRole"];
    assert_eq!(role["Type"], "AWS::IAM::Role");
    assert_eq!(
        role["Properties"]["AssumeRolePolicyDocument"]["Statement"][0]["Condition"]
            ["StringEquals"]["sts:ExternalId"],
        "ext-123"
    );
    assert!(template["Outputs"]["OrdersCheckoutStateMachineAccessRoleArn"].is_object());
}

#[test]
fn generate_writes_to_output_path() {
    let dir = workspace();
    let output_path = dir.path().join("extended.json");

    offline(dir.path(), "generate")
        .arg("--template")
        .arg(dir.path().join("template.json"))
        .arg("--output")
        .arg(&output_path)
        .assert()
        .success();

    assert!(read_json(&output_path)["Resources"]["OrdersCreateOrderFunctionAccessRole"].is_object());
    assert!(read_json(&dir.path().join("template.json"))["Outputs"].is_null());
}

#[test]
fn export_writes_manifest() {
    let dir = workspace();

    offline(dir.path(), "export")
        .arg("--outputs-file")
        .arg(dir.path().join("outputs.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 access roles"));

    let manifest = read_json(&dir.path().join("dist/data/service-outputs.json"));
    assert_eq!(
        manifest["orders"]["createOrder"]["role"],
        "arn:aws:iam::123456789012:role/orders-createOrder"
    );
    assert_eq!(manifest["orders"]["createOrder"]["description"], "Creates an order");
    assert_eq!(
        manifest["orders"]["checkout"]["arn"],
        "arn:aws:states:us-east-1:123456789012:stateMachine:Checkout"
    );
}

#[test]
fn export_fails_when_role_output_missing() {
    let dir = workspace();
    fs::write(
        dir.path().join("outputs.json"),
        r#"{"OrdersCreateOrderFunctionAccessRoleArn": "arn:aws:iam::123456789012:role/orders-createOrder"}"#,
    )
    .unwrap();

    offline(dir.path(), "export")
        .arg("--outputs-file")
        .arg(dir.path().join("outputs.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("OrdersCheckoutStateMachineAccessRoleArn"));

    assert!(!dir.path().join("dist").exists());
}

#[test]
fn missing_required_config_field_fails() {
    let dir = workspace();
    fs::write(
        dir.path().join("config.json"),
        r#"{"principalAccountId": "111122223333"}"#,
    )
    .unwrap();

    offline(dir.path(), "plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("principalRoleName"));
}
