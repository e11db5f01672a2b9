use crate::error::FormError;
use crate::fields::{FieldEdit, FieldObserver, FieldRenderer, LocalValue, RenderContext};
use crate::spec::FieldDefinition;
use crate::ui::{Element, UiNode};

/// Multi-select checkbox group. The selection travels in a hidden input as a
/// `;` joined string.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckboxField;

impl FieldRenderer for CheckboxField {
    fn initial_value(&self, initial: Option<&str>) -> LocalValue {
        LocalValue::split_set(initial)
    }

    fn apply_edit(
        &self,
        field: &FieldDefinition,
        local: &mut LocalValue,
        edit: &FieldEdit,
        observer: &mut dyn FieldObserver,
    ) -> Result<(), FormError> {
        let FieldEdit::Toggle { value, checked } = edit else {
            return Err(edit.mismatch(field));
        };
        if !matches!(local, LocalValue::Set(_)) {
            *local = LocalValue::split_set(local.as_scalar());
        }
        if *checked {
            local.insert(value);
        } else {
            local.remove(value);
        }
        observer.interacted(&field.name);
        observer.value_changed(&field.name, edit);
        Ok(())
    }

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
        let decorate = cx.presentation.hooks.render_checkbox.as_ref();

        let hidden = Element::new("input")
            .attr("type", "hidden")
            .attr("name", &field.name)
            .attr("value", value.submitted());

        Ok(Element::new("div")
            .class(options.choice_container_class_name.as_deref())
            .child(hidden.into_node())
            .children(field.options.iter().map(|option| {
                Element::new("label")
                    .class(options.choice_label_class_name.as_deref())
                    .child(
                        Element::new("input")
                            .attr("type", "checkbox")
                            .attr("id", &option.value)
                            .attr("value", &option.value)
                            .flag("checked", value.contains(&option.value))
                            .class(options.choice_field_class_name.as_deref())
                            .into_node(),
                    )
                    .child(
                        decorate
                            .map(|hook| hook(&option.value, &option.label))
                            .unwrap_or(UiNode::Empty),
                    )
                    .child(Element::new("span").text(&option.label).into_node())
                    .into_node()
            }))
            .into_node())
    }
}
