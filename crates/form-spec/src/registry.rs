use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::fields::{CheckboxField, FieldRenderer, RadioField, SelectField, TextAreaField, TextField};
use crate::spec::FieldKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("No field of type {0}")]
    UnknownFieldType(String),
}

/// Maps `fieldType` tags onto renderers. Built once at startup and shared.
#[derive(Clone, Default)]
pub struct FieldRegistry {
    handlers: BTreeMap<String, Arc<dyn FieldRenderer>>,
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("tags", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a stock renderer for every [`FieldKind`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in FieldKind::ALL {
            registry.register(kind.as_str(), stock_renderer(kind));
        }
        registry
    }

    /// Associates `tag` with `renderer`, replacing and returning any previous one.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        renderer: Arc<dyn FieldRenderer>,
    ) -> Option<Arc<dyn FieldRenderer>> {
        self.handlers.insert(tag.into(), renderer)
    }

    pub fn resolve(&self, tag: &str) -> Result<&dyn FieldRenderer, RegistryError> {
        self.handlers
            .get(tag)
            .map(|renderer| renderer.as_ref())
            .ok_or_else(|| RegistryError::UnknownFieldType(tag.to_string()))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

fn stock_renderer(kind: FieldKind) -> Arc<dyn FieldRenderer> {
    match kind {
        FieldKind::Text | FieldKind::Number | FieldKind::Phone => Arc::new(TextField),
        FieldKind::TextArea => Arc::new(TextAreaField),
        FieldKind::Select => Arc::new(SelectField),
        FieldKind::Radio => Arc::new(RadioField),
        FieldKind::Checkbox => Arc::new(CheckboxField),
    }
}
