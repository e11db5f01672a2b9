use std::collections::BTreeMap;

use crate::spec::{field::FieldDefinition, form::FormDefinition};

/// Flattened view of the active (default) field groups of a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormLayout {
    /// Top-level fields in render order.
    pub fields: Vec<FieldDefinition>,
    /// Every named field reachable from `fields`, dependents included.
    pub by_name: BTreeMap<String, FieldDefinition>,
}

impl FormLayout {
    pub fn build(form: &FormDefinition) -> Self {
        let mut layout = FormLayout::default();
        for field in form
            .form_field_groups
            .iter()
            .filter(|group| group.default)
            .flat_map(|group| group.fields.iter())
        {
            if !field.name.is_empty() {
                layout.fields.push(field.clone());
                layout.by_name.insert(field.name.clone(), field.clone());
            }
            layout.index_dependents(field);
        }
        layout
    }

    fn index_dependents(&mut self, field: &FieldDefinition) {
        for dependent in field
            .dependent_field_filters
            .iter()
            .filter_map(|filter| filter.dependent_form_field.as_deref())
        {
            if !dependent.name.is_empty() {
                self.by_name
                    .insert(dependent.name.clone(), dependent.clone());
            }
            self.index_dependents(dependent);
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}
