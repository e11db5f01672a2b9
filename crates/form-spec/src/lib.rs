#![allow(missing_docs)]

pub mod compose;
pub mod error;
pub mod events;
pub mod fields;
pub mod observer;
pub mod options;
pub mod registry;
pub mod session;
pub mod spec;
pub mod submission;
pub mod ui;
pub mod visibility;

pub use compose::compose_field;
pub use error::FormError;
pub use events::{EventReporter, FormEvent, FormEventKind, TracingReporter};
pub use fields::{FieldEdit, FieldObserver, FieldRenderer, FieldState, LocalValue, RenderContext};
pub use observer::FirstVisibleObserver;
pub use options::{Presentation, RenderHooks, RenderOptions};
pub use registry::{FieldRegistry, RegistryError};
pub use session::{FormSession, SessionEffect, SubmissionStatus};
pub use spec::{
    DependentFieldFilter, FieldDefinition, FieldGroup, FieldKind, FieldOption, Filter,
    FormDefinition, FormLayout,
};
pub use submission::{
    PendingSubmission, SubmissionContext, SubmissionRequest, SubmissionResponse,
    SubmissionTransport, SubmittedField, TransportError, TransportResponse,
};
pub use ui::{Element, UiNode};
pub use visibility::is_visible;

/// Renders the UI tree as a JSON value, the structured counterpart of
/// [`UiNode::to_html`].
pub fn render_json_ui(node: &UiNode) -> serde_json::Value {
    serde_json::to_value(node).unwrap_or(serde_json::Value::Null)
}

/// JSON schema of [`FormDefinition`], for validating form exports.
pub fn form_definition_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(FormDefinition)).unwrap_or(serde_json::Value::Null)
}
