use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::SourceError;
use crate::node::ContentNode;

/// Default host of HubSpot's forms listing API.
pub const DEFAULT_LISTING_BASE_URL: &str = "https://api.hubapi.com";

/// Node type used when none is configured.
pub const DEFAULT_NODE_TYPE: &str = "HubspotForm";

fn default_node_type() -> String {
    DEFAULT_NODE_TYPE.to_string()
}

/// Ingestion options as configured by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceOptions {
    pub hubspot_api_key: String,
    #[serde(rename = "type", default = "default_node_type")]
    pub node_type: String,
}

impl SourceOptions {
    pub fn new(hubspot_api_key: impl Into<String>) -> Self {
        Self {
            hubspot_api_key: hubspot_api_key.into(),
            node_type: default_node_type(),
        }
    }

    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = node_type.into();
        self
    }
}

/// Receives the nodes created during ingestion.
pub trait NodeSink {
    fn create_node(&mut self, node: ContentNode) -> Result<(), SourceError>;
}

impl NodeSink for Vec<ContentNode> {
    fn create_node(&mut self, node: ContentNode) -> Result<(), SourceError> {
        self.push(node);
        Ok(())
    }
}

/// Fetches every form of a portal and turns each into a [`ContentNode`].
#[derive(Debug, Clone)]
pub struct FormSource {
    options: SourceOptions,
    base_url: String,
    http: reqwest::Client,
}

impl FormSource {
    pub fn new(options: SourceOptions) -> Result<Self, SourceError> {
        if options.hubspot_api_key.trim().is_empty() {
            return Err(SourceError::MissingApiKey);
        }
        Ok(Self {
            options,
            base_url: DEFAULT_LISTING_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn options(&self) -> &SourceOptions {
        &self.options
    }

    /// One GET of the listing endpoint. No retries.
    pub async fn fetch_forms(&self) -> Result<Vec<Value>, SourceError> {
        let url = format!("{}/forms/v2/forms", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[("hapikey", self.options.hubspot_api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches the listing and hands one node per form to `sink`. Returns the
    /// number of nodes created.
    pub async fn source_nodes(&self, sink: &mut dyn NodeSink) -> Result<usize, SourceError> {
        info!("fetching Hubspot Forms");
        let descriptors = self.fetch_forms().await?;

        for (index, descriptor) in descriptors.iter().enumerate() {
            let node = ContentNode::from_descriptor(index, descriptor, &self.options.node_type)?;
            debug!(
                "Creating hubspot form {} ({})",
                node.name().unwrap_or_default(),
                node.id
            );
            sink.create_node(node)?;
        }
        Ok(descriptors.len())
    }
}
