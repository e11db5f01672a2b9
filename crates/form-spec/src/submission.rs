use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default host of HubSpot's submission API.
pub const DEFAULT_SUBMIT_BASE_URL: &str = "https://api.hsforms.com";

/// Cookie holding HubSpot's visitor tracking token.
pub const TRACKING_COOKIE: &str = "hubspotutk";

/// Submission endpoint for a form.
pub fn submit_url(base_url: &str, portal_id: &str, guid: &str) -> String {
    format!(
        "{}/submissions/v3/integration/submit/{}/{}",
        base_url.trim_end_matches('/'),
        portal_id,
        guid
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type_id: Option<String>,
    pub name: String,
    pub value: String,
}

/// Page information sent with every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_name: Option<String>,
    pub page_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hutk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl SubmissionContext {
    pub fn new(page_uri: impl Into<String>) -> Self {
        Self {
            page_uri: page_uri.into(),
            ..Default::default()
        }
    }

    pub fn with_page_name(mut self, page_name: impl Into<String>) -> Self {
        self.page_name = Some(page_name.into());
        self
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    /// Picks the tracking token out of a `Cookie` header.
    pub fn with_cookie_header(mut self, header: &str) -> Self {
        self.hutk = cookie_value(header, TRACKING_COOKIE);
        self
    }
}

/// Looks up `name` in a `k=v; k2=v2` cookie string.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    static PAIR: OnceLock<Regex> = OnceLock::new();
    let pair = PAIR.get_or_init(|| {
        Regex::new(r"(?:^|;)\s*([^=;\s]+)\s*=\s*([^;]+)").expect("cookie pattern is valid")
    });
    pair.captures_iter(header)
        .find(|captures| &captures[1] == name)
        .map(|captures| captures[2].trim_end().to_string())
}

/// JSON body posted to the submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubmissionRequest {
    pub fields: Vec<SubmittedField>,
    pub context: SubmissionContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct SubmissionErrorMessage {
    #[serde(default)]
    pub message: String,
}

/// Structured body HubSpot returns when it rejects a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct SubmissionResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<SubmissionErrorMessage>,
}

/// Outbound request prepared by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub url: String,
    pub request: SubmissionRequest,
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("submission transport failed: {0}")]
pub struct TransportError(pub String);

/// Sends a prepared submission. No retries, no timeout beyond the transport's own.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(
        &self,
        submission: &PendingSubmission,
    ) -> Result<TransportResponse, TransportError>;
}
