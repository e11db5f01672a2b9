use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hubspot_form_source::HttpTransport;
use hubspot_form_spec::{
    FieldEdit, FieldRegistry, FormDefinition, FormSession, Presentation, RenderOptions,
    SubmissionContext, SubmissionStatus,
};

fn form() -> FormDefinition {
    serde_json::from_value(json!({
        "id": "newsletter",
        "portalId": 62515,
        "guid": "d4e5f6",
        "name": "Newsletter",
        "formFieldGroups": [
            { "default": true, "fields": [
                { "name": "email", "type": "string", "fieldType": "text", "objectTypeId": "0-1" }
            ] }
        ]
    }))
    .expect("form")
}

fn session(server: &MockServer) -> FormSession {
    FormSession::new(
        form(),
        Arc::new(FieldRegistry::with_defaults()),
        Arc::new(Presentation::new(RenderOptions::default())),
    )
    .with_context(SubmissionContext::new("https://example.com/news"))
    .with_submit_base_url(server.uri())
}

#[tokio::test]
async fn posts_json_to_the_submission_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submissions/v3/integration/submit/62515/d4e5f6"))
        .and(body_json(json!({
            "fields": [{ "objectTypeId": "0-1", "name": "email", "value": "ada@example.com" }],
            "context": { "pageUri": "https://example.com/news" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "inlineMessage": "Thanks" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.edit("email", FieldEdit::input("ada@example.com")).unwrap();
    session.submit(&HttpTransport::new()).await.expect("submit");

    assert_eq!(session.status(), SubmissionStatus::Success);
}

#[tokio::test]
async fn rejection_body_is_kept_for_display() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "message": "The request is not valid",
            "errors": [{ "message": "Error in 'fields.email'. Invalid email address" }]
        })))
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.edit("email", FieldEdit::input("nope")).unwrap();
    session.submit(&HttpTransport::new()).await.expect("submit");

    assert_eq!(session.status(), SubmissionStatus::Failed);
    let response = session.response().expect("response");
    assert_eq!(response.errors.len(), 1);
}

#[tokio::test]
async fn missing_endpoint_fails_the_submission() {
    let server = MockServer::start().await;

    let mut session = session(&server);
    session.edit("email", FieldEdit::input("ada@example.com")).unwrap();
    session.submit(&HttpTransport::new()).await.expect("submit");

    assert_eq!(session.status(), SubmissionStatus::Failed);
    assert!(session.response().is_none());
}
