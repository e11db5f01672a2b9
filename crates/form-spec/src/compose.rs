use tracing::warn;

use crate::error::FormError;
use crate::fields::RenderContext;
use crate::spec::FieldDefinition;
use crate::ui::{Element, UiNode};

/// Wraps a field's control with its label and required marker.
///
/// Hidden fields never get a label. A field type without a registered renderer
/// becomes an inline error instead of failing the whole form.
pub fn compose_field(field: &FieldDefinition, cx: &RenderContext<'_>) -> Result<UiNode, FormError> {
    let options = cx.options();
    let mut container = Element::new("div").class(options.field_container_class_name.as_deref());

    if options.show_labels
        && !field.hidden
        && let Some(label) = field.label.as_deref().filter(|label| !label.is_empty())
    {
        let mut label_element = Element::new("label")
            .class(options.label_class_name.as_deref())
            .attr("for", &field.name)
            .child(Element::new("p").child(UiNode::html(label)).into_node());
        if field.required
            && let Some(required_text) = options.required_text.as_deref()
        {
            label_element = label_element.child(
                Element::new("span")
                    .class(options.required_class_name.as_deref())
                    .child(Element::new("span").text(required_text).into_node())
                    .into_node(),
            );
        }
        container = container.child(label_element.into_node());
    }

    let control = match cx.registry.resolve(&field.field_type) {
        Ok(renderer) => {
            let value = cx.value_of(field, renderer);
            renderer.render(field, &value, cx)?
        }
        Err(err) => {
            warn!(field = %field.name, field_type = %field.field_type, "no renderer registered");
            cx.presentation.error(&err.to_string())
        }
    };

    Ok(container.child(control).into_node())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::options::{Presentation, RenderOptions};
    use crate::registry::FieldRegistry;

    fn compose(field: &FieldDefinition, options: RenderOptions) -> UiNode {
        let registry = FieldRegistry::with_defaults();
        let presentation = Presentation::new(options);
        let states = BTreeMap::new();
        let cx = RenderContext {
            registry: &registry,
            presentation: &presentation,
            states: &states,
        };
        compose_field(field, &cx).expect("compose")
    }

    fn labelled(hidden: bool) -> FieldDefinition {
        FieldDefinition {
            name: "email".into(),
            label: Some("Email <em>address</em>".into()),
            field_type: "text".into(),
            required: true,
            hidden,
            ..Default::default()
        }
    }

    fn labels() -> RenderOptions {
        RenderOptions {
            show_labels: true,
            required_text: Some("*".into()),
            required_class_name: Some("req".into()),
            ..Default::default()
        }
    }

    #[test]
    fn label_and_required_marker_are_rendered() {
        let html = compose(&labelled(false), labels()).to_html();
        assert!(html.contains("<label for=\"email\"><p>Email <em>address</em></p>"));
        assert!(html.contains("<span class=\"req\"><span>*</span></span>"));
    }

    #[test]
    fn hidden_fields_never_get_a_label() {
        let node = compose(&labelled(true), labels());
        assert!(node.elements().iter().all(|element| element.tag != "label"));
        assert!(node.elements().iter().any(|element| element.tag == "input"));
    }

    #[test]
    fn labels_are_opt_in() {
        let node = compose(&labelled(false), RenderOptions::default());
        assert!(node.elements().iter().all(|element| element.tag != "label"));
    }

    #[test]
    fn unknown_field_type_degrades_to_message() {
        let field = FieldDefinition {
            name: "upload".into(),
            field_type: "file".into(),
            ..Default::default()
        };
        let node = compose(&field, RenderOptions::default());
        assert_eq!(node.text_content(), "No field of type file");
    }
}
