use hubspot_form_spec::FormDefinition;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::SourceError;

/// Parent id shared by every node created from the listing.
pub const SOURCE_PARENT: &str = "__SOURCE__";

/// Descriptor keys copied verbatim onto the node. `portalId` is stringified.
pub const COPIED_KEYS: [&str; 16] = [
    "portalId",
    "guid",
    "name",
    "action",
    "method",
    "cssClass",
    "redirect",
    "submitText",
    "followUpId",
    "notifyRecipients",
    "leadNurturingCampaignId",
    "formFieldGroups",
    "metaData",
    "inlineMessage",
    "isPublished",
    "thankYouMessageJson",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInternal {
    #[serde(rename = "type")]
    pub node_type: String,
    pub content_digest: String,
}

/// A form published to the host's content graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub children: Vec<String>,
    pub parent: String,
    pub internal: NodeInternal,
}

impl ContentNode {
    /// Maps one listing entry onto a node and stamps its digest.
    pub fn from_descriptor(
        index: usize,
        descriptor: &Value,
        node_type: &str,
    ) -> Result<Self, SourceError> {
        let invalid = |reason: &str| SourceError::InvalidDescriptor {
            index,
            reason: reason.to_string(),
        };
        let object = descriptor
            .as_object()
            .ok_or_else(|| invalid("not a JSON object"))?;
        let guid = object
            .get("guid")
            .and_then(Value::as_str)
            .filter(|guid| !guid.is_empty())
            .ok_or_else(|| invalid("missing guid"))?;
        let portal_id = match object.get("portalId") {
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::String(text)) => text.clone(),
            _ => return Err(invalid("missing portalId")),
        };

        let mut fields: Map<String, Value> = COPIED_KEYS
            .iter()
            .filter_map(|key| object.get(*key).map(|value| (key.to_string(), value.clone())))
            .collect();
        fields.insert("portalId".into(), Value::String(portal_id));

        let mut node = Self {
            id: guid.to_string(),
            fields,
            children: Vec::new(),
            parent: SOURCE_PARENT.to_string(),
            internal: NodeInternal {
                node_type: node_type.to_string(),
                content_digest: String::new(),
            },
        };
        node.internal.content_digest = node.digest()?;
        Ok(node)
    }

    /// SHA-256 of the node serialized with an empty digest.
    pub fn digest(&self) -> Result<String, SourceError> {
        let mut unstamped = self.clone();
        unstamped.internal.content_digest.clear();
        let bytes = serde_json::to_vec(&unstamped)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// Reads the node back as a renderable form; the node id doubles as the form id.
    pub fn form_definition(&self) -> Result<FormDefinition, SourceError> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor() -> Value {
        json!({
            "portalId": 62515,
            "guid": "7e9a3c2b",
            "name": "Newsletter",
            "submitText": "Join",
            "createdAt": 1700000000000u64,
            "formFieldGroups": [{ "default": true, "fields": [{ "name": "email", "fieldType": "text" }] }]
        })
    }

    #[test]
    fn copies_known_keys_and_stringifies_portal_id() {
        let node = ContentNode::from_descriptor(0, &descriptor(), "HubspotForm").unwrap();
        assert_eq!(node.id, "7e9a3c2b");
        assert_eq!(node.fields["portalId"], json!("62515"));
        assert!(!node.fields.contains_key("createdAt"));
        assert_eq!(node.parent, "__SOURCE__");
        assert!(node.children.is_empty());
        assert_eq!(node.internal.node_type, "HubspotForm");

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["internal"]["type"], "HubspotForm");
        assert_eq!(value["submitText"], "Join");
    }

    #[test]
    fn digest_covers_content_but_not_itself() {
        let node = ContentNode::from_descriptor(0, &descriptor(), "HubspotForm").unwrap();
        assert_eq!(node.internal.content_digest.len(), 64);
        assert_eq!(node.digest().unwrap(), node.internal.content_digest);

        let mut renamed = descriptor();
        renamed["name"] = json!("Newsletter v2");
        let other = ContentNode::from_descriptor(0, &renamed, "HubspotForm").unwrap();
        assert_ne!(other.internal.content_digest, node.internal.content_digest);

        let retyped = ContentNode::from_descriptor(0, &descriptor(), "Form").unwrap();
        assert_ne!(retyped.internal.content_digest, node.internal.content_digest);
    }

    #[test]
    fn descriptors_without_identity_are_rejected() {
        let err = ContentNode::from_descriptor(3, &json!({ "portalId": 1 }), "HubspotForm")
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidDescriptor { index: 3, .. }));

        let err = ContentNode::from_descriptor(0, &json!({ "guid": "g" }), "HubspotForm")
            .unwrap_err();
        assert!(err.to_string().contains("missing portalId"));
    }

    #[test]
    fn node_reads_back_as_a_form() {
        let node = ContentNode::from_descriptor(0, &descriptor(), "HubspotForm").unwrap();
        let form = node.form_definition().unwrap();
        assert_eq!(form.id, "7e9a3c2b");
        assert_eq!(form.submission_identity(), Some(("62515", "7e9a3c2b")));
        assert_eq!(form.form_field_groups[0].fields[0].name, "email");
    }
}
