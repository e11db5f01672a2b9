use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::spec::field::FieldDefinition;

/// Free-form `name`/`value` metadata attached to a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormMetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Rich text block that HubSpot places between field groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct RichText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Ordered bundle of fields. Only groups flagged `default` are rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub is_smart_group: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_text: Option<RichText>,
    #[serde(default)]
    pub is_page_break: bool,
}

/// Top-level HubSpot form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub portal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_recipients: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_nurturing_campaign_id: Option<String>,
    #[serde(default)]
    pub form_field_groups: Vec<FieldGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_data: Vec<FormMetaData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thank_you_message_json: Option<String>,
}

impl FormDefinition {
    /// Portal id and submission guid, when both are present and non-empty.
    pub fn submission_identity(&self) -> Option<(&str, &str)> {
        let portal_id = self.portal_id.as_deref().filter(|id| !id.is_empty())?;
        let guid = self.guid.as_deref().filter(|guid| !guid.is_empty())?;
        Some((portal_id, guid))
    }

    /// Name reported alongside analytics events.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim)
    }

    /// DOM id used for the rendered `<form>`: the name (or id) with whitespace removed.
    pub fn element_id(&self) -> String {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
            .split_whitespace()
            .collect()
    }
}

/// HubSpot's listing API returns `portalId` as a number while content nodes carry a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_portal_id_is_stringified() {
        let form: FormDefinition =
            serde_json::from_value(json!({ "id": "f", "portalId": 4242, "guid": "g" }))
                .expect("deserialize");
        assert_eq!(form.portal_id.as_deref(), Some("4242"));
        assert_eq!(form.submission_identity(), Some(("4242", "g")));
    }

    #[test]
    fn empty_guid_is_not_an_identity() {
        let form: FormDefinition =
            serde_json::from_value(json!({ "id": "f", "portalId": "1", "guid": "" }))
                .expect("deserialize");
        assert_eq!(form.submission_identity(), None);
    }

    #[test]
    fn element_id_strips_whitespace() {
        let form = FormDefinition {
            id: "abc".into(),
            name: Some("Contact Us  Today".into()),
            ..Default::default()
        };
        assert_eq!(form.element_id(), "ContactUsToday");
        let unnamed = FormDefinition {
            id: "abc".into(),
            ..Default::default()
        };
        assert_eq!(unnamed.element_id(), "abc");
    }
}
