use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ui::{Element, UiNode};

/// Presentation options. Every key is optional and has a documented fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub form_class_name: Option<String>,
    pub field_container_class_name: Option<String>,
    pub label_class_name: Option<String>,
    pub required_class_name: Option<String>,
    /// Class applied to text inputs, textareas and selects.
    pub field_class_name: Option<String>,
    /// Wrapper around the inputs of a radio or checkbox field.
    pub choice_container_class_name: Option<String>,
    /// Label wrapping each radio or checkbox input.
    pub choice_label_class_name: Option<String>,
    /// Class of each radio or checkbox input.
    pub choice_field_class_name: Option<String>,
    pub success_class_name: Option<String>,
    pub failure_class_name: Option<String>,
    pub response_class_name: Option<String>,
    pub submit_class_name: Option<String>,
    pub error_class_name: Option<String>,
    pub show_labels: bool,
    pub required_text: Option<String>,
    /// Disabled "please choose" entry injected at the top of selects.
    pub select_text: Option<String>,
    /// Rows of textarea fields, 3 when unset.
    pub text_area_rows: Option<u32>,
    /// Submit label when the form has no `submitText`, "Submit" when unset.
    pub default_submit_text: Option<String>,
    pub default_success_message: Option<String>,
    pub default_failure_message: Option<String>,
    pub hide_submit_button: bool,
    /// Render the structured error response above the form instead of inside it.
    pub show_form_response_outside: bool,
}

impl RenderOptions {
    pub fn text_area_rows(&self) -> u32 {
        self.text_area_rows.unwrap_or(3)
    }

    pub fn submit_text<'a>(&'a self, form_submit_text: Option<&'a str>) -> &'a str {
        form_submit_text
            .filter(|text| !text.is_empty())
            .or(self.default_submit_text.as_deref())
            .unwrap_or("Submit")
    }
}

type ErrorHook = Arc<dyn Fn(&str) -> UiNode + Send + Sync>;
type SubmitHook = Arc<dyn Fn(&str) -> UiNode + Send + Sync>;
type CheckboxHook = Arc<dyn Fn(&str, &str) -> UiNode + Send + Sync>;

/// Caller supplied overrides for parts of the rendered tree.
#[derive(Clone, Default)]
pub struct RenderHooks {
    /// Replaces the default error box.
    pub show_error: Option<ErrorHook>,
    /// Replaces the `<span>` inside the submit button.
    pub render_submit_button: Option<SubmitHook>,
    /// Extra decoration rendered after each checkbox input; receives value and label.
    pub render_checkbox: Option<CheckboxHook>,
}

impl fmt::Debug for RenderHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHooks")
            .field("show_error", &self.show_error.is_some())
            .field("render_submit_button", &self.render_submit_button.is_some())
            .field("render_checkbox", &self.render_checkbox.is_some())
            .finish()
    }
}

impl RenderHooks {
    pub fn with_show_error(
        mut self,
        hook: impl Fn(&str) -> UiNode + Send + Sync + 'static,
    ) -> Self {
        self.show_error = Some(Arc::new(hook));
        self
    }

    pub fn with_submit_button(
        mut self,
        hook: impl Fn(&str) -> UiNode + Send + Sync + 'static,
    ) -> Self {
        self.render_submit_button = Some(Arc::new(hook));
        self
    }

    pub fn with_checkbox(
        mut self,
        hook: impl Fn(&str, &str) -> UiNode + Send + Sync + 'static,
    ) -> Self {
        self.render_checkbox = Some(Arc::new(hook));
        self
    }
}

/// Options plus hooks, shared by every renderer of a form.
#[derive(Debug, Clone, Default)]
pub struct Presentation {
    pub options: RenderOptions,
    pub hooks: RenderHooks,
}

impl Presentation {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            hooks: RenderHooks::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: RenderHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Inline error box used for configuration problems.
    pub fn error(&self, message: &str) -> UiNode {
        match &self.hooks.show_error {
            Some(hook) => hook(message),
            None => Element::new("div")
                .class(Some(
                    self.options
                        .error_class_name
                        .as_deref()
                        .unwrap_or("hubspot-form-error"),
                ))
                .attr("role", "alert")
                .text(message)
                .into_node(),
        }
    }

    pub fn submit_body(&self, text: &str) -> UiNode {
        match &self.hooks.render_submit_button {
            Some(hook) => hook(text),
            None => Element::new("span").text(text).into_node(),
        }
    }
}
