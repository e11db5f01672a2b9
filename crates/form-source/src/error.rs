use thiserror::Error;

/// Failures while listing forms or publishing their nodes.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("hubspotApiKey is required")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("form listing returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A listed form lacks a usable `guid` or `portalId`.
    #[error("form #{index} in the listing is invalid: {reason}")]
    InvalidDescriptor { index: usize, reason: String },
    #[error("node sink failed: {0}")]
    Sink(#[from] std::io::Error),
}
