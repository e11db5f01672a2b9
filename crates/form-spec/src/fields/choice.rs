use crate::error::FormError;
use crate::fields::{FieldRenderer, LocalValue, RenderContext};
use crate::spec::FieldDefinition;
use crate::ui::{Element, UiNode};
use crate::visibility::render_dependents;

/// Drop-down with a single selected value.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectField;

/// Radio group with a single selected value.
#[derive(Debug, Default, Clone, Copy)]
pub struct RadioField;

impl FieldRenderer for SelectField {
    fn render(
        &self,
        field: &FieldDefinition,
        value: &LocalValue,
        cx: &RenderContext<'_>,
    ) -> Result<UiNode, FormError> {
        if field.options.is_empty() {
            return Ok(UiNode::Empty);
        }
        let options = cx.options();
        let current = value.as_scalar().filter(|value| !value.is_empty());

        let mut select = Element::new("select")
            .attr("id", &field.name)
            .attr("name", &field.name)
            .opt_attr("placeholder", field.placeholder.as_deref())
            .flag("hidden", field.hidden)
            .flag("required", field.required)
            .class(options.field_class_name.as_deref());

        if let Some(select_text) = options.select_text.as_deref() {
            select = select.child(
                Element::new("option")
                    .attr("label", select_text)
                    .attr("value", "")
                    .flag("disabled", true)
                    .flag("selected", current.is_none())
                    .text(select_text)
                    .into_node(),
            );
        }
        select = select.children(field.options.iter().map(|option| {
            Element::new("option")
                .attr("label", &option.label)
                .attr("value", &option.value)
                .flag("selected", current == Some(option.value.as_str()))
                .text(&option.label)
                .into_node()
        }));

        Ok(UiNode::fragment([
            select.into_node(),
            render_dependents(field, current, cx)?,
        ]))
    }
}

impl FieldRenderer for RadioField {
    fn render(
        &self,
        field: &FieldDefinition,
        value: &LocalValue,
        cx: &RenderContext<'_>,
    ) -> Result<UiNode, FormError> {
        if field.options.is_empty() {
            return Ok(UiNode::Empty);
        }
        let options = cx.options();
        let current = value.as_scalar().filter(|value| !value.is_empty());

        let group = Element::new("div")
            .class(options.choice_container_class_name.as_deref())
            .children(field.options.iter().map(|option| {
                Element::new("label")
                    .class(options.choice_label_class_name.as_deref())
                    .child(
                        Element::new("input")
                            .attr("type", "radio")
                            .attr("name", &field.name)
                            .attr("value", &option.value)
                            .flag("checked", current == Some(option.value.as_str()))
                            .flag("required", field.required)
                            .class(options.choice_field_class_name.as_deref())
                            .into_node(),
                    )
                    .child(Element::new("span").text(&option.label).into_node())
                    .into_node()
            }));

        Ok(UiNode::fragment([
            group.into_node(),
            render_dependents(field, current, cx)?,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldEdit;
    use crate::fields::testing::{Recorder, render_with};
    use crate::options::{Presentation, RenderOptions};
    use crate::spec::FieldOption;

    fn choice(field_type: &str) -> FieldDefinition {
        FieldDefinition {
            name: "size".into(),
            field_type: field_type.into(),
            options: vec![
                FieldOption::new("Small", "s"),
                FieldOption::new("Medium", "m"),
                FieldOption::new("Large", "l"),
            ],
            ..Default::default()
        }
    }

    fn checked_values(node: &UiNode) -> Vec<String> {
        node.elements()
            .into_iter()
            .filter(|element| element.has("checked") || element.has("selected"))
            .filter_map(|element| element.get("value").map(str::to_string))
            .collect()
    }

    #[test]
    fn only_the_latest_selection_is_marked() {
        let renderers: [(&dyn FieldRenderer, &str); 2] =
            [(&RadioField, "radio"), (&SelectField, "select")];
        for (renderer, field_type) in renderers {
            let field = choice(field_type);
            let mut value = renderer.initial_value(Some("s"));
            let mut recorder = Recorder::default();
            renderer
                .apply_edit(&field, &mut value, &FieldEdit::input("l"), &mut recorder)
                .expect("edit");
            let node = render_with(&field, &value, &Presentation::default()).expect("render");
            assert_eq!(checked_values(&node), vec!["l".to_string()]);
            assert_eq!(node.form_data(), vec![("size".into(), "l".into())]);
        }
    }

    #[test]
    fn choice_without_options_renders_nothing() {
        for field_type in ["radio", "select"] {
            let mut field = choice(field_type);
            field.options.clear();
            let node = render_with(&field, &LocalValue::default(), &Presentation::default())
                .expect("render");
            assert!(node.is_empty());
        }
    }

    #[test]
    fn select_placeholder_is_disabled_and_not_submitted() {
        let field = choice("select");
        let presentation = Presentation::new(RenderOptions {
            select_text: Some("Please choose".into()),
            ..Default::default()
        });
        let node = render_with(&field, &LocalValue::default(), &presentation).expect("render");
        let options: Vec<_> = node
            .elements()
            .into_iter()
            .filter(|element| element.tag == "option")
            .collect();
        assert_eq!(options.len(), 4);
        assert_eq!(options[0].get("value"), Some(""));
        assert!(options[0].has("disabled"));
        assert!(node.form_data().is_empty());
    }
}
