//! Field renderers and the contract they share.
//!
//! A renderer is stateless: the per-field [`LocalValue`] lives in the form
//! session and is handed in for every render and edit. Edits are applied
//! optimistically to the local value before the [`FieldObserver`] is told about
//! them.

pub mod checkbox;
pub mod choice;
pub mod state;
pub mod text;

use std::collections::BTreeMap;

pub use checkbox::CheckboxField;
pub use choice::{RadioField, SelectField};
pub use state::{FieldState, LocalValue, MULTI_VALUE_DELIMITER};
pub use text::{TextAreaField, TextField};

use crate::compose::compose_field;
use crate::error::FormError;
use crate::options::{Presentation, RenderOptions};
use crate::registry::FieldRegistry;
use crate::spec::FieldDefinition;
use crate::ui::UiNode;

/// A user edit delivered to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Typed text or a picked radio/select option.
    Input(String),
    /// A checkbox option switched on or off.
    Toggle { value: String, checked: bool },
}

impl FieldEdit {
    pub fn input(value: impl Into<String>) -> Self {
        FieldEdit::Input(value.into())
    }

    pub fn toggle(value: impl Into<String>, checked: bool) -> Self {
        FieldEdit::Toggle {
            value: value.into(),
            checked,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FieldEdit::Input(_) => "input",
            FieldEdit::Toggle { .. } => "toggle",
        }
    }

    pub(crate) fn mismatch(&self, field: &FieldDefinition) -> FormError {
        FormError::EditMismatch {
            field: field.name.clone(),
            field_type: field.field_type.clone(),
            edit: self.label(),
        }
    }
}

/// Upward notifications emitted by every renderer on each edit.
pub trait FieldObserver {
    /// The user touched the field; flips the form dirty.
    fn interacted(&mut self, field: &str);
    /// The raw edit that was just applied.
    fn value_changed(&mut self, field: &str, edit: &FieldEdit);
}

/// Everything a renderer needs besides its own field and value.
pub struct RenderContext<'a> {
    pub registry: &'a FieldRegistry,
    pub presentation: &'a Presentation,
    pub states: &'a BTreeMap<String, FieldState>,
}

impl<'a> RenderContext<'a> {
    pub fn options(&self) -> &'a RenderOptions {
        &self.presentation.options
    }

    /// Current local value of `field`, or its normalized empty value when the
    /// session holds no state for it yet.
    pub fn value_of(&self, field: &FieldDefinition, renderer: &dyn FieldRenderer) -> LocalValue {
        self.states
            .get(&field.name)
            .map(|state| state.local().clone())
            .unwrap_or_else(|| renderer.initial_value(None))
    }

    /// Renders a nested field through the same composer as top-level fields.
    pub fn compose(&self, field: &FieldDefinition) -> Result<UiNode, FormError> {
        compose_field(field, self)
    }
}

/// Renders one kind of field and applies edits to its local value.
pub trait FieldRenderer: Send + Sync {
    /// Normalizes an externally supplied value into local state.
    fn initial_value(&self, initial: Option<&str>) -> LocalValue {
        LocalValue::Scalar(initial.map(str::to_string))
    }

    /// Applies a user edit and notifies `observer`.
    fn apply_edit(
        &self,
        field: &FieldDefinition,
        local: &mut LocalValue,
        edit: &FieldEdit,
        observer: &mut dyn FieldObserver,
    ) -> Result<(), FormError> {
        match edit {
            FieldEdit::Input(value) => {
                *local = LocalValue::Scalar(Some(value.clone()));
                observer.interacted(&field.name);
                observer.value_changed(&field.name, edit);
                Ok(())
            }
            FieldEdit::Toggle { .. } => Err(edit.mismatch(field)),
        }
    }

    fn render(
        &self,
        field: &FieldDefinition,
        value: &LocalValue,
        cx: &RenderContext<'_>,
    ) -> Result<UiNode, FormError>;
}
