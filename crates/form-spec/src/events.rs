use serde_json::{Map, Value};
use tracing::info;

use crate::spec::FormDefinition;

/// Analytics events emitted over a form's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEventKind {
    View,
    Submit,
    Success,
    Failure,
    Error,
    Abandoned,
}

impl FormEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormEventKind::View => "hubspot_form_view",
            FormEventKind::Submit => "hubspot_form_submit",
            FormEventKind::Success => "hubspot_form_success",
            FormEventKind::Failure => "hubspot_form_failure",
            FormEventKind::Error => "hubspot_form_error",
            FormEventKind::Abandoned => "hubspot_form_abandoned",
        }
    }
}

/// An event plus its payload (`formId`, `formName` and event specific keys).
#[derive(Debug, Clone, PartialEq)]
pub struct FormEvent {
    pub kind: FormEventKind,
    pub data: Map<String, Value>,
}

impl FormEvent {
    pub fn new(kind: FormEventKind, form: &FormDefinition) -> Self {
        let mut data = Map::new();
        data.insert("formId".into(), Value::String(form.id.clone()));
        if let Some(name) = form.display_name() {
            data.insert("formName".into(), Value::String(name.to_string()));
        }
        Self { kind, data }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Receives analytics events. Implementations must not block.
pub trait EventReporter: Send + Sync {
    fn report(&self, event: &FormEvent);
}

/// Reporter that writes every event to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl EventReporter for TracingReporter {
    fn report(&self, event: &FormEvent) {
        let data = Value::Object(event.data.clone());
        info!(
            event = event.name(),
            data = %data,
            "form event"
        );
    }
}
