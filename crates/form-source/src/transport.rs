use async_trait::async_trait;
use hubspot_form_spec::{PendingSubmission, SubmissionTransport, TransportError, TransportResponse};
use tracing::debug;

/// Posts submissions as JSON with reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    async fn submit(
        &self,
        submission: &PendingSubmission,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .http
            .post(&submission.url)
            .json(&submission.request)
            .send()
            .await
            .map_err(|err| TransportError(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError(err.to_string()))?;
        debug!(url = %submission.url, status, "submission answered");
        Ok(TransportResponse { status, body })
    }
}
