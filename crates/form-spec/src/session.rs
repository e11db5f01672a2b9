//! Form lifecycle: field state, dirty tracking, submission state machine and
//! analytics.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::compose::compose_field;
use crate::error::FormError;
use crate::events::{EventReporter, FormEvent, FormEventKind};
use crate::fields::{FieldEdit, FieldObserver, FieldState, LocalValue, RenderContext};
use crate::observer::FirstVisibleObserver;
use crate::options::Presentation;
use crate::registry::FieldRegistry;
use crate::spec::{FormDefinition, FormLayout};
use crate::submission::{
    DEFAULT_SUBMIT_BASE_URL, PendingSubmission, SubmissionContext, SubmissionRequest,
    SubmissionResponse, SubmissionTransport, SubmittedField, TransportError, TransportResponse,
    submit_url,
};
use crate::ui::{Element, UiNode};

/// DOM id of the block shown after a successful submission.
pub const SUCCESS_ANCHOR: &str = "success-response";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Success,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Success => "success",
            SubmissionStatus::Failed => "failed",
        }
    }
}

/// Side effects the host performs after a submission completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Scroll the element with this id into view.
    ScrollTo(String),
    /// Open this URL in a new browsing context.
    Redirect(String),
}

type SuccessCallback = Box<dyn FnMut() + Send>;
type ChangeCallback = Box<dyn FnMut(&str, &FieldEdit) + Send>;

/// One rendered instance of a form.
pub struct FormSession {
    form: Arc<FormDefinition>,
    layout: FormLayout,
    registry: Arc<FieldRegistry>,
    presentation: Arc<Presentation>,
    reporter: Option<Arc<dyn EventReporter>>,
    states: BTreeMap<String, FieldState>,
    status: SubmissionStatus,
    dirty: bool,
    response: Option<SubmissionResponse>,
    context: SubmissionContext,
    submit_base_url: String,
    observer: FirstVisibleObserver,
    viewed: bool,
    closed: bool,
    on_success: Option<SuccessCallback>,
    on_change: Option<ChangeCallback>,
}

impl FormSession {
    pub fn new(
        form: impl Into<Arc<FormDefinition>>,
        registry: Arc<FieldRegistry>,
        presentation: Arc<Presentation>,
    ) -> Self {
        let form = form.into();
        let layout = FormLayout::build(&form);
        let mut session = Self {
            form,
            layout,
            registry,
            presentation,
            reporter: None,
            states: BTreeMap::new(),
            status: SubmissionStatus::Idle,
            dirty: false,
            response: None,
            context: SubmissionContext::default(),
            submit_base_url: DEFAULT_SUBMIT_BASE_URL.to_string(),
            observer: FirstVisibleObserver::default(),
            viewed: false,
            closed: false,
            on_success: None,
            on_change: None,
        };
        session.states = session.initial_states();
        session
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn EventReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_context(mut self, context: SubmissionContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_submit_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.submit_base_url = base_url.into();
        self
    }

    pub fn with_observer(mut self, observer: FirstVisibleObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_values(mut self, values: &BTreeMap<String, String>) -> Self {
        self.set_values(values);
        self
    }

    /// Called once per transition into [`SubmissionStatus::Success`].
    pub fn on_success(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Receives every raw field edit after it has been applied.
    pub fn on_change(mut self, callback: impl FnMut(&str, &FieldEdit) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn layout(&self) -> &FormLayout {
        &self.layout
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_been_viewed(&self) -> bool {
        self.viewed
    }

    pub fn response(&self) -> Option<&SubmissionResponse> {
        self.response.as_ref()
    }

    pub fn value(&self, name: &str) -> Option<&LocalValue> {
        self.states.get(name).map(FieldState::local)
    }

    fn initial_states(&self) -> BTreeMap<String, FieldState> {
        self.layout
            .by_name
            .iter()
            .map(|(name, field)| {
                let local = match self.registry.resolve(&field.field_type) {
                    Ok(renderer) => renderer.initial_value(None),
                    Err(_) => LocalValue::default(),
                };
                (name.clone(), FieldState::new(None, local))
            })
            .collect()
    }

    /// Reconciles every field with the externally supplied values. Fields whose
    /// external value is unchanged keep their local edits.
    pub fn set_values(&mut self, values: &BTreeMap<String, String>) {
        for (name, field) in &self.layout.by_name {
            let Some(state) = self.states.get_mut(name) else {
                continue;
            };
            let renderer = self.registry.resolve(&field.field_type).ok();
            let reset = state.reconcile(values.get(name).map(String::as_str), |external| {
                match renderer {
                    Some(renderer) => renderer.initial_value(external),
                    None => LocalValue::Scalar(external.map(str::to_string)),
                }
            });
            if reset {
                debug!(field = %name, "field value reset from external value");
            }
        }
    }

    /// Applies a user edit to field `name`. A form without a portal id or guid
    /// only ever shows the configuration error, so it accepts no edits.
    pub fn edit(&mut self, name: &str, edit: FieldEdit) -> Result<(), FormError> {
        if self.form.submission_identity().is_none() {
            return Err(FormError::InvalidConfiguration {
                form_id: self.form.id.clone(),
            });
        }
        let field = self
            .layout
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        let renderer = self.registry.resolve(&field.field_type).map_err(|_| {
            FormError::UnsupportedFieldType {
                field: field.name.clone(),
                field_type: field.field_type.clone(),
            }
        })?;
        let state = self
            .states
            .entry(name.to_string())
            .or_insert_with(|| FieldState::new(None, renderer.initial_value(None)));
        let mut notifications = Notifications {
            dirty: &mut self.dirty,
            status: &mut self.status,
            on_change: self.on_change.as_mut(),
        };
        renderer.apply_edit(field, state.local_mut(), &edit, &mut notifications)
    }

    fn render_context(&self) -> RenderContext<'_> {
        RenderContext {
            registry: &self.registry,
            presentation: &self.presentation,
            states: &self.states,
        }
    }

    fn render_fields(&self) -> Result<Vec<UiNode>, FormError> {
        let cx = self.render_context();
        self.layout
            .fields
            .iter()
            .map(|field| compose_field(field, &cx))
            .collect()
    }

    /// Name/value pairs the rendered controls would submit, in render order.
    pub fn form_data(&self) -> Result<Vec<(String, String)>, FormError> {
        Ok(UiNode::fragment(self.render_fields()?).form_data())
    }

    /// Renders the current state of the form.
    ///
    /// Only an unsupported dependent-field operator is an error; every other
    /// problem renders as an inline message.
    pub fn render(&self) -> Result<UiNode, FormError> {
        let presentation = &self.presentation;
        let options = &presentation.options;

        if self.form.submission_identity().is_none() {
            return Ok(presentation.error("Invalid form configuration"));
        }

        match self.status {
            SubmissionStatus::Success => {
                let message = match self.form.inline_message.as_deref() {
                    Some(html) if !html.is_empty() => {
                        Element::new("div").child(UiNode::html(html)).into_node()
                    }
                    _ => Element::new("p")
                        .text(options.default_success_message.as_deref().unwrap_or_default())
                        .into_node(),
                };
                return Ok(Element::new("div")
                    .attr("id", SUCCESS_ANCHOR)
                    .class(options.success_class_name.as_deref())
                    .child(message)
                    .into_node());
            }
            SubmissionStatus::Failed if self.response.is_none() => {
                return Ok(Element::new("div")
                    .class(options.failure_class_name.as_deref())
                    .child(
                        Element::new("p")
                            .text(options.default_failure_message.as_deref().unwrap_or_default())
                            .into_node(),
                    )
                    .into_node());
            }
            _ => {}
        }

        let response = self
            .response
            .as_ref()
            .map(|response| self.response_node(response))
            .unwrap_or(UiNode::Empty);
        let (outside, inside) = if options.show_form_response_outside {
            (response, UiNode::Empty)
        } else {
            (UiNode::Empty, response)
        };

        let name = self.form.element_id();
        let mut form = Element::new("form")
            .attr("id", &name)
            .attr("method", "POST")
            .class(options.form_class_name.as_deref())
            .child(inside)
            .children(self.render_fields()?);

        if !options.hide_submit_button {
            let submit_text = options.submit_text(self.form.submit_text.as_deref());
            form = form.child(
                Element::new("button")
                    .attr("id", format!("Submit {name}"))
                    .attr("type", "submit")
                    .class(options.submit_class_name.as_deref())
                    .child(presentation.submit_body(submit_text))
                    .into_node(),
            );
        }

        Ok(UiNode::fragment([outside, form.into_node()]))
    }

    fn response_node(&self, response: &SubmissionResponse) -> UiNode {
        Element::new("div")
            .class(self.presentation.options.response_class_name.as_deref())
            .child(Element::new("h3").text(&response.message).into_node())
            .children(
                response
                    .errors
                    .iter()
                    .map(|error| Element::new("p").text(&error.message).into_node()),
            )
            .into_node()
    }

    fn report(&self, event: FormEvent) {
        if let Some(reporter) = &self.reporter {
            reporter.report(&event);
        }
    }

    /// Builds the submission for the current field values and clears the dirty
    /// flag. Forms without a portal id or guid never produce a request.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, FormError> {
        let url = match self.form.submission_identity() {
            Some((portal_id, guid)) => submit_url(&self.submit_base_url, portal_id, guid),
            None => {
                return Err(FormError::InvalidConfiguration {
                    form_id: self.form.id.clone(),
                });
            }
        };
        let fields = self
            .form_data()?
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .filter_map(|(name, value)| {
                let field = self.layout.field(&name)?;
                Some(SubmittedField {
                    object_type_id: field.object_type_id.clone(),
                    name,
                    value,
                })
            })
            .collect::<Vec<_>>();

        self.report(FormEvent::new(FormEventKind::Submit, &self.form));
        self.dirty = false;
        debug!(form_id = %self.form.id, fields = fields.len(), "submitting form");
        Ok(PendingSubmission {
            url,
            request: SubmissionRequest {
                fields,
                context: self.context.clone(),
            },
        })
    }

    /// Resolves the state machine with the transport outcome.
    pub fn complete_submit(
        &mut self,
        result: Result<TransportResponse, TransportError>,
    ) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        match result {
            Ok(response) if response.is_success() => {
                self.response = None;
                self.report(FormEvent::new(FormEventKind::Success, &self.form));
                if self.dirty {
                    // Edited while the request was in flight; keep the form on screen.
                    self.status = SubmissionStatus::Idle;
                    return effects;
                }
                info!(form_id = %self.form.id, "form submitted");
                self.status = SubmissionStatus::Success;
                effects.push(SessionEffect::ScrollTo(SUCCESS_ANCHOR.to_string()));
                if let Some(callback) = self.on_success.as_mut() {
                    callback();
                }
                if let Some(redirect) = self.form.redirect.as_deref().filter(|url| !url.is_empty()) {
                    effects.push(SessionEffect::Redirect(redirect.to_string()));
                }
            }
            Ok(response) => {
                warn!(form_id = %self.form.id, status = response.status, "form submission rejected");
                let event = FormEvent::new(FormEventKind::Failure, &self.form);
                match serde_json::from_str::<SubmissionResponse>(&response.body) {
                    Ok(parsed) => {
                        let body = serde_json::to_value(&parsed).unwrap_or(Value::Null);
                        self.report(event.with("formResponse", body));
                        self.response = Some(parsed);
                    }
                    Err(err) => {
                        debug!(error = %err, "unreadable submission error body");
                        self.report(event);
                        self.response = None;
                    }
                }
                self.status = SubmissionStatus::Failed;
            }
            Err(err) => {
                warn!(form_id = %self.form.id, error = %err, "form submission failed");
                self.report(FormEvent::new(FormEventKind::Error, &self.form));
                self.response = None;
                self.status = SubmissionStatus::Failed;
            }
        }
        effects
    }

    /// Prepares, sends and resolves a submission in one go.
    pub async fn submit(
        &mut self,
        transport: &dyn SubmissionTransport,
    ) -> Result<Vec<SessionEffect>, FormError> {
        let pending = self.begin_submit()?;
        let result = transport.submit(&pending).await;
        Ok(self.complete_submit(result))
    }

    pub fn observe_intersection(&mut self, ratio: f64, now: Instant) {
        self.observer.intersection(ratio, now);
    }

    pub fn observe_page_visibility(&mut self, visible: bool) {
        self.observer.page_visibility(visible);
    }

    /// Reports `hubspot_form_view` the first time the form settles into view.
    pub fn poll_visibility(&mut self, now: Instant) -> bool {
        if !self.observer.poll(now) {
            return false;
        }
        self.viewed = true;
        self.report(FormEvent::new(FormEventKind::View, &self.form));
        true
    }

    /// Tears the session down, reporting abandonment when the form holds edits
    /// that were never submitted. Only the first call has an effect.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if !self.dirty || self.form.submission_identity().is_none() {
            return;
        }
        let non_empty: Vec<Value> = match self.form_data() {
            Ok(data) => data
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(name, _)| Value::String(name))
                .collect(),
            Err(err) => {
                warn!(error = %err, "could not collect fields of abandoned form");
                Vec::new()
            }
        };
        let mut event = FormEvent::new(FormEventKind::Abandoned, &self.form);
        if !non_empty.is_empty() {
            event = event.with("formNonEmptyFields", Value::Array(non_empty));
        }
        self.report(event);
    }

    /// Swaps in a new definition, closing out the current one first.
    pub fn replace_form(&mut self, form: impl Into<Arc<FormDefinition>>) {
        self.close();
        self.form = form.into();
        self.layout = FormLayout::build(&self.form);
        self.states = self.initial_states();
        self.status = SubmissionStatus::Idle;
        self.dirty = false;
        self.response = None;
        self.observer = FirstVisibleObserver::default();
        self.viewed = false;
        self.closed = false;
    }
}

impl Drop for FormSession {
    fn drop(&mut self) {
        self.close();
    }
}

struct Notifications<'a> {
    dirty: &'a mut bool,
    status: &'a mut SubmissionStatus,
    on_change: Option<&'a mut ChangeCallback>,
}

impl FieldObserver for Notifications<'_> {
    fn interacted(&mut self, _field: &str) {
        *self.dirty = true;
        *self.status = SubmissionStatus::Idle;
    }

    fn value_changed(&mut self, field: &str, edit: &FieldEdit) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(field, edit);
        }
    }
}
