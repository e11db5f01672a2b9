use crate::error::FormError;
use crate::fields::{FieldRenderer, LocalValue, RenderContext};
use crate::spec::{FieldDefinition, FieldKind};
use crate::ui::{Element, UiNode};

/// Single-line input used for `text`, `number` and `phonenumber` fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextField;

/// Multi-line input for `textarea` fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextAreaField;

/// HTML input type for a text-like field.
pub fn input_type(field: &FieldDefinition) -> &'static str {
    match (field.kind(), field.property_type.as_deref()) {
        (Some(FieldKind::Phone), _) | (_, Some("phonenumber")) => "tel",
        (Some(FieldKind::Number), _) | (_, Some("number")) => "number",
        (_, Some("string")) if field.name == "email" => "email",
        _ => "text",
    }
}

impl FieldRenderer for TextField {
    fn render(
        &self,
        field: &FieldDefinition,
        value: &LocalValue,
        cx: &RenderContext<'_>,
    ) -> Result<UiNode, FormError> {
        Ok(Element::new("input")
            .attr("type", input_type(field))
            .attr("id", &field.name)
            .attr("name", &field.name)
            .opt_attr("value", value.as_scalar())
            .opt_attr("placeholder", field.placeholder.as_deref())
            .flag("hidden", field.hidden)
            .flag("required", field.required)
            .class(cx.options().field_class_name.as_deref())
            .into_node())
    }
}

impl FieldRenderer for TextAreaField {
    fn render(
        &self,
        field: &FieldDefinition,
        value: &LocalValue,
        cx: &RenderContext<'_>,
    ) -> Result<UiNode, FormError> {
        let textarea = Element::new("textarea")
            .attr("id", &field.name)
            .attr("name", &field.name)
            .attr("rows", cx.options().text_area_rows().to_string())
            .opt_attr("placeholder", field.placeholder.as_deref())
            .flag("hidden", field.hidden)
            .flag("required", field.required)
            .class(cx.options().field_class_name.as_deref());
        Ok(match value.as_scalar() {
            Some(text) if !text.is_empty() => textarea.text(text),
            _ => textarea,
        }
        .into_node())
    }
}
