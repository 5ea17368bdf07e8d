#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use medform::{
    FormData, FormView, HtmlField, HtmlForm, Notification, NotificationSink, SubmitControl,
};
use medform_submit::{
    BoxFuture, Navigator, Request, Response, Result, StaticCredentials, SubmissionPipeline,
    SubmitError, Transport,
};
use tokio::sync::Notify;

/// Transport answering from a queue of canned results.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<Response>>>,
    requests: Mutex<Vec<Request>>,
    gate: Option<Arc<Notify>>,
    on_send: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, reply: Result<Response>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Holds every exchange until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Runs `hook` while each exchange is in progress.
    pub fn on_send(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_send = Some(Box::new(hook));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn send<'a>(&'a self, request: Request) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request);
            if let Some(hook) = &self.on_send {
                hook();
            }
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let reply = self.replies.lock().unwrap().pop_front();
            reply.unwrap_or_else(|| Err(SubmitError::Network("no scripted reply".into())))
        })
    }
}

/// Notification sink remembering everything it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.shown.lock().unwrap().push(notification);
    }
}

/// Navigator remembering every target.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        self.visited.lock().unwrap().push(url.to_string());
    }
}

/// A pipeline wired to test doubles.
pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub pipeline: SubmissionPipeline,
}

impl Harness {
    pub fn new(transport: ScriptedTransport) -> Self {
        Self::with_token(transport, Some("tok+en"))
    }

    pub fn with_token(transport: ScriptedTransport, token: Option<&str>) -> Self {
        let transport = Arc::new(transport);
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let credentials = token.map_or_else(StaticCredentials::none, StaticCredentials::new);
        let pipeline = SubmissionPipeline::new(
            transport.clone(),
            Arc::new(credentials),
            notifier.clone(),
            navigator.clone(),
        );
        Self {
            transport,
            notifier,
            navigator,
            pipeline,
        }
    }
}

pub fn saved(redirect_url: &str) -> Result<Response> {
    Ok(Response::with_json(&serde_json::json!({
        "success": true,
        "redirect_url": redirect_url,
    })))
}

pub fn patient_form() -> HtmlForm {
    HtmlForm::new("patient-form")
        .action("/patients/new/", "post")
        .field(HtmlField::new("name", "Name").value("Li Lei"))
        .field(HtmlField::new("age", "Age").value("34"))
        .submit_button("Save")
}

/// Submit control state visible outside the borrowed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub disabled: bool,
    pub label: String,
}

/// Form whose submit control state can be read while a submission holds it.
pub struct WatchedForm {
    form: HtmlForm,
    state: Arc<Mutex<ControlState>>,
}

impl WatchedForm {
    pub fn new(form: HtmlForm) -> Self {
        let label = form.submit_label().unwrap_or_default();
        Self {
            form,
            state: Arc::new(Mutex::new(ControlState {
                disabled: false,
                label,
            })),
        }
    }

    pub fn state(&self) -> Arc<Mutex<ControlState>> {
        self.state.clone()
    }

    pub fn form(&self) -> &HtmlForm {
        &self.form
    }
}

impl FormView for WatchedForm {
    fn form_data(&self) -> FormData {
        self.form.form_data()
    }

    fn show_field_error(&mut self, field: &str, message: &str) {
        self.form.show_field_error(field, message);
    }

    fn clear_field_error(&mut self, field: &str) {
        self.form.clear_field_error(field);
    }

    fn focus(&mut self, field: &str) {
        self.form.focus(field);
    }

    fn submit_native(&mut self) {
        self.form.submit_native();
    }
}

impl SubmitControl for WatchedForm {
    fn submit_label(&self) -> Option<String> {
        self.form.submit_label()
    }

    fn set_submit_state(&mut self, disabled: bool, label: &str) {
        self.form.set_submit_state(disabled, label);
        *self.state.lock().unwrap() = ControlState {
            disabled,
            label: label.to_string(),
        };
    }
}
