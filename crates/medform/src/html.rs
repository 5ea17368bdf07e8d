//! In-memory Bootstrap 5 form.
//!
//! [`HtmlForm`] keeps the state a browser form would hold (values, error
//! styling, feedback elements, focus, submit button) and renders it as
//! Bootstrap 5 markup.

use ironhtml::typed::Element;
use ironhtml_elements::{Button, Div, Form, Input, Label, Span};

use crate::data::FormData;
use crate::view::{FormView, SubmitControl};

/// CSS class marking a field in its error state.
pub const INVALID_CLASS: &str = "is-invalid";

/// CSS class of the feedback element following an errored field.
pub const FEEDBACK_CLASS: &str = "invalid-feedback";

/// A file chosen in a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// One input of an [`HtmlForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlField {
    /// Field name.
    pub name: String,
    /// Label text.
    pub label: String,
    /// HTML input type.
    pub input_type: String,
    /// Current value.
    pub value: String,
    /// Chosen file for file inputs.
    pub file: Option<SelectedFile>,
    /// CSS classes besides `form-control`.
    pub classes: Vec<String>,
    /// Text of the feedback element, `None` when the element does not exist.
    pub feedback: Option<String>,
}

impl HtmlField {
    /// Creates a field.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            input_type: "text".to_string(),
            value: String::new(),
            file: None,
            classes: Vec::new(),
            feedback: None,
        }
    }

    /// Sets the input type.
    #[must_use]
    pub fn input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = input_type.into();
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Returns whether the field is in its error state.
    pub fn is_invalid(&self) -> bool {
        self.classes.iter().any(|c| c == INVALID_CLASS)
    }

    /// Appends this field's `mb-3` group to a form.
    fn render_into(&self, form: Element<Form>) -> Element<Form> {
        let id = format!("id_{}", self.name);
        let mut class = "form-control".to_string();
        for extra in &self.classes {
            class.push(' ');
            class.push_str(extra);
        }

        let input = Element::<Input>::new()
            .attr("type", &self.input_type)
            .class(&class)
            .attr("id", &id)
            .attr("name", &self.name)
            .when(self.input_type != "file", |i| i.attr("value", &self.value))
            .render();

        form.child::<Div, _>(|d| {
            d.class("mb-3")
                .child::<Label, _>(|l| l.attr("for", &id).class("form-label").text(&self.label))
                .raw(&input)
                .when(self.feedback.is_some(), |d| {
                    d.child::<Div, _>(|f| {
                        f.class(FEEDBACK_CLASS)
                            .text(self.feedback.as_deref().unwrap_or(""))
                    })
                })
        })
    }
}

/// The submit button of an [`HtmlForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    /// Button label.
    pub label: String,
    /// Whether the button is disabled.
    pub disabled: bool,
}

/// A form held in memory.
#[derive(Debug, Clone, Default)]
pub struct HtmlForm {
    id: String,
    action: String,
    method: String,
    fields: Vec<HtmlField>,
    submit: Option<SubmitButton>,
    focused: Option<String>,
    native_submits: usize,
}

impl HtmlForm {
    /// Creates an empty form.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            action: String::new(),
            method: "post".to_string(),
            ..Self::default()
        }
    }

    /// Sets the form action and method.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>, method: impl Into<String>) -> Self {
        self.action = action.into();
        self.method = method.into();
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: HtmlField) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a submit button.
    #[must_use]
    pub fn submit_button(mut self, label: impl Into<String>) -> Self {
        self.submit = Some(SubmitButton {
            label: label.into(),
            disabled: false,
        });
        self
    }

    /// Returns the form id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a field by name.
    pub fn get(&self, name: &str) -> Option<&HtmlField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut HtmlField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Sets a value without firing an input event.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.get_mut(name) {
            field.value = value.into();
        }
    }

    /// Chooses a file for a file input.
    pub fn select_file(&mut self, name: &str, file: SelectedFile) {
        if let Some(field) = self.get_mut(name) {
            field.value.clone_from(&file.file_name);
            field.file = Some(file);
        }
    }

    /// Types into a field: sets the value and clears its error state.
    pub fn input(&mut self, name: &str, value: impl Into<String>) {
        self.set_value(name, value);
        self.clear_field_error(name);
    }

    /// Returns whether a field is in its error state.
    pub fn is_invalid(&self, name: &str) -> bool {
        self.get(name).is_some_and(HtmlField::is_invalid)
    }

    /// Returns a field's feedback text.
    pub fn feedback(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|f| f.feedback.as_deref())
    }

    /// Returns the focused field.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Returns the submit button.
    pub const fn button(&self) -> Option<&SubmitButton> {
        self.submit.as_ref()
    }

    /// Returns how many native submissions happened.
    pub const fn native_submits(&self) -> usize {
        self.native_submits
    }

    /// Renders the form as Bootstrap 5 HTML.
    pub fn render(&self) -> String {
        let mut form = Element::<Form>::new()
            .attr("id", &self.id)
            .attr("action", &self.action)
            .attr("method", &self.method)
            .attr("novalidate", "novalidate");

        if self.fields.iter().any(|f| f.input_type == "file") {
            form = form.attr("enctype", "multipart/form-data");
        }

        for field in &self.fields {
            form = field.render_into(form);
        }

        if let Some(button) = &self.submit {
            form = form.child::<Div, _>(|d| {
                d.child::<Button, _>(|b| {
                    b.attr("type", "submit")
                        .class("btn btn-primary")
                        .when(button.disabled, |b| {
                            b.attr("disabled", "disabled").child::<Span, _>(|s| {
                                s.class("spinner-border spinner-border-sm me-1")
                                    .attr("role", "status")
                                    .attr("aria-hidden", "true")
                            })
                        })
                        .text(&button.label)
                })
            });
        }

        form.render()
    }
}

impl FormView for HtmlForm {
    fn form_data(&self) -> FormData {
        let mut data = FormData::new();
        for field in &self.fields {
            match (&field.file, field.input_type.as_str()) {
                (Some(file), _) => data.append_file(
                    &field.name,
                    &file.file_name,
                    file.content_type.clone(),
                    file.bytes.clone(),
                ),
                (None, "file") => {}
                (None, _) => data.append(&field.name, &field.value),
            }
        }
        data
    }

    fn show_field_error(&mut self, field: &str, message: &str) {
        if let Some(field) = self.get_mut(field) {
            if !field.is_invalid() {
                field.classes.push(INVALID_CLASS.to_string());
            }
            field.feedback = Some(message.to_string());
        }
    }

    fn clear_field_error(&mut self, field: &str) {
        if let Some(field) = self.get_mut(field) {
            field.classes.retain(|c| c != INVALID_CLASS);
            if let Some(feedback) = field.feedback.as_mut() {
                feedback.clear();
            }
        }
    }

    fn focus(&mut self, field: &str) {
        if self.get(field).is_some() {
            self.focused = Some(field.to_string());
        }
    }

    fn submit_native(&mut self) {
        tracing::debug!(form = %self.id, action = %self.action, "Native form submission");
        self.native_submits += 1;
    }
}

impl SubmitControl for HtmlForm {
    fn submit_label(&self) -> Option<String> {
        self.submit.as_ref().map(|b| b.label.clone())
    }

    fn set_submit_state(&mut self, disabled: bool, label: &str) {
        if let Some(button) = self.submit.as_mut() {
            button.disabled = disabled;
            label.clone_into(&mut button.label);
        }
    }
}
