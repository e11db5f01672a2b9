use std::path::PathBuf;

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("hubspot-forms").expect("binary");
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout")
}

#[test]
fn render_prints_html() {
    let assert = cli()
        .args(["render", "--form"])
        .arg(fixture("contact_form.json"))
        .assert()
        .success();
    let html = stdout_of(&assert);
    assert!(html.starts_with("<form"));
    assert!(html.contains("name=\"firstname\""));
    assert!(html.contains("<span>Send</span>"));
}

#[test]
fn render_json_reflects_values_and_options() {
    let temp = TempDir::new().expect("temp dir");
    let values = temp.child("values.json");
    values
        .write_str(r#"{ "firstname": "Ada", "interest": "yes", "topics": ["red"] }"#)
        .expect("values");
    let options = temp.child("options.json");
    options
        .write_str(r#"{ "showLabels": true, "formClassName": "hs-form" }"#)
        .expect("options");

    let assert = cli()
        .args(["render", "--format", "json", "--form"])
        .arg(fixture("contact_form.json"))
        .arg("--values")
        .arg(values.path())
        .arg("--options")
        .arg(options.path())
        .assert()
        .success();
    let tree: Value = serde_json::from_str(&stdout_of(&assert)).expect("json tree");

    assert_eq!(tree["tag"], "form");
    assert_eq!(tree["attrs"]["class"], "hs-form");
    let text = tree.to_string();
    assert!(text.contains("\"value\":\"Ada\""));
    assert!(text.contains("\"id\":\"company\""));
    assert!(text.contains("\"value\":\"red\""));
}

#[test]
fn submit_refuses_forms_without_identity() {
    let temp = TempDir::new().expect("temp dir");
    let form = temp.child("form.json");
    form.write_str(
        &json!({
            "id": "broken",
            "portalId": 1,
            "formFieldGroups": []
        })
        .to_string(),
    )
    .expect("form");

    let assert = cli()
        .args(["submit", "--endpoint", "http://127.0.0.1:9", "--form"])
        .arg(form.path())
        .assert()
        .failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).expect("utf8");
    assert!(stderr.contains("InvalidConfiguration"));
}

#[test]
fn ingest_needs_an_api_key() {
    let temp = TempDir::new().expect("temp dir");
    cli()
        .env_remove("HUBSPOT_API_KEY")
        .args(["ingest", "--out"])
        .arg(temp.path())
        .assert()
        .failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn ingest_writes_one_file_per_form() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forms/v2/forms"))
        .and(query_param("hapikey", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "portalId": 7, "guid": "first-form", "name": "First" },
            { "portalId": 7, "guid": "second-form", "name": "Second" }
        ])))
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let out = temp.path().to_path_buf();
    let endpoint = server.uri();
    tokio::task::spawn_blocking(move || {
        cli()
            .env("HUBSPOT_API_KEY", "secret")
            .args(["ingest", "--type", "Form", "--endpoint", &endpoint, "--out"])
            .arg(&out)
            .assert()
            .success();
    })
    .await
    .expect("cli run");

    assert!(temp.child("first-form.json").path().exists());
    let node: Value = serde_json::from_str(
        &std::fs::read_to_string(temp.path().join("second-form.json")).expect("node file"),
    )
    .expect("node json");
    assert_eq!(node["id"], "second-form");
    assert_eq!(node["portalId"], "7");
    assert_eq!(node["internal"]["type"], "Form");
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submissions/v3/integration/submit/123456/0f3c5b7e-1d2a-4c8e-9b6f-2a7d9e1c4b30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let values = temp.child("values.json");
    values
        .write_str(r#"{ "email": "ada@example.com" }"#)
        .expect("values");
    let values = values.path().to_path_buf();
    let endpoint = server.uri();

    let stdout = tokio::task::spawn_blocking(move || {
        let assert = cli()
            .args(["submit", "--page-uri", "https://example.com", "--endpoint", &endpoint])
            .arg("--form")
            .arg(fixture("contact_form.json"))
            .arg("--values")
            .arg(&values)
            .assert()
            .success();
        stdout_of(&assert)
    })
    .await
    .expect("cli run");

    let report: Value = serde_json::from_str(&stdout).expect("report");
    assert_eq!(report["status"], "success");
    assert_eq!(report["effects"][0]["scrollTo"], "success-response");
}
