//! Conditional display of dependent fields.

use crate::error::FormError;
use crate::fields::RenderContext;
use crate::spec::{FieldDefinition, Filter};
use crate::ui::UiNode;

/// Operator matching when the parent value equals `strValue` or is one of `strValues`.
pub const SET_ANY: &str = "SET_ANY";

impl Filter {
    /// Whether this rule accepts `parent_value`. Unknown operators are errors.
    pub fn matches(&self, parent_value: &str) -> Result<bool, FormError> {
        match self.operator.as_deref() {
            Some(SET_ANY) => Ok(self.str_value.as_deref() == Some(parent_value)
                || self.str_values.iter().any(|value| value == parent_value)),
            other => Err(FormError::UnsupportedFilterOperator {
                operator: other.unwrap_or("??").to_string(),
            }),
        }
    }
}

/// OR over `filters`. Every operator is checked, so a corrupt rule fails the
/// render even when an earlier rule already matched or the parent is empty.
pub fn is_visible(filters: &[Filter], parent_value: Option<&str>) -> Result<bool, FormError> {
    let parent_value = parent_value.unwrap_or_default();
    let mut visible = false;
    for filter in filters {
        visible |= filter.matches(parent_value)? && !parent_value.is_empty();
    }
    Ok(visible)
}

/// Renders the enabled dependents of `field` whose filters accept `parent_value`.
pub fn render_dependents(
    field: &FieldDefinition,
    parent_value: Option<&str>,
    cx: &RenderContext<'_>,
) -> Result<UiNode, FormError> {
    let mut nodes = Vec::new();
    for dependent in field.enabled_dependents() {
        if !is_visible(&dependent.filters, parent_value)? {
            continue;
        }
        if let Some(nested) = dependent.dependent_form_field.as_deref() {
            nodes.push(cx.compose(nested)?);
        }
    }
    Ok(UiNode::fragment(nodes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_any(value: &str) -> Filter {
        Filter {
            operator: Some(SET_ANY.into()),
            str_value: Some(value.into()),
            ..Default::default()
        }
    }

    #[test]
    fn single_reference_value() {
        let filters = [set_any("yes")];
        assert!(is_visible(&filters, Some("yes")).unwrap());
        assert!(!is_visible(&filters, Some("no")).unwrap());
        assert!(!is_visible(&filters, None).unwrap());
    }

    #[test]
    fn reference_set() {
        let filters = [Filter {
            operator: Some(SET_ANY.into()),
            str_values: vec!["a".into(), "b".into()],
            ..Default::default()
        }];
        assert!(is_visible(&filters, Some("b")).unwrap());
        assert!(!is_visible(&filters, Some("c")).unwrap());
    }

    #[test]
    fn any_filter_grants_visibility() {
        let filters = [set_any("x"), set_any("y")];
        assert!(is_visible(&filters, Some("y")).unwrap());
    }

    #[test]
    fn unknown_operator_fails_loudly() {
        let filters = [
            set_any("yes"),
            Filter {
                operator: Some("IS_NOT_EMPTY".into()),
                ..Default::default()
            },
        ];
        for parent in [Some("yes"), Some("no"), None] {
            assert_eq!(
                is_visible(&filters, parent),
                Err(FormError::UnsupportedFilterOperator {
                    operator: "IS_NOT_EMPTY".into()
                })
            );
        }
    }
}
