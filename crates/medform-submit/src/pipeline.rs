//! Asynchronous submission of a validated form.
//!
//! [`SubmissionPipeline::submit`] performs at most one exchange per call:
//!
//! 1. Another submission of the same pipeline still running yields
//!    [`SubmissionOutcome::InFlight`].
//! 2. The pre-submit guard may abort with [`SubmissionOutcome::Aborted`].
//! 3. The submit control is disabled and relabelled until the exchange ends.
//! 4. The request carries the form data, the anti-forgery header and the
//!    JSON/XHR headers.
//! 5. A 2xx JSON response notifies success and returns the data at once. A
//!    configured redirect runs afterwards on a spawned task, once the delay
//!    has passed. Anything else notifies failure.
//!
//! The pipeline counts as in flight until a scheduled redirect has fired.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::LocalBoxFuture;
use medform::{FormData, FormView, Notification, NotificationSink, SubmitControl, SubmitHandler};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{SubmitConfig, ERROR_TITLE, SUCCESS_TITLE};
use crate::credentials::{CredentialProvider, CSRF_HEADER};
use crate::error::{Result, SubmitError};
use crate::navigation::Navigator;
use crate::request::Request;
use crate::transport::Transport;

/// How a submission ended.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// The server accepted the form and answered with this JSON.
    Success { data: Value },
    /// The pre-submit guard declined.
    Aborted,
    /// Another submission was still running.
    InFlight,
    /// The exchange failed.
    Failure { error: SubmitError },
}

impl SubmissionOutcome {
    /// Returns whether the submission succeeded.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the response data of a successful submission.
    pub const fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data } => Some(data),
            _ => None,
        }
    }

    /// Returns the error of a failed submission.
    pub const fn error(&self) -> Option<&SubmitError> {
        match self {
            Self::Failure { error } => Some(error),
            _ => None,
        }
    }
}

/// Submits forms over a [`Transport`].
pub struct SubmissionPipeline {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialProvider>,
    notifier: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
    in_flight: Arc<AtomicBool>,
}

impl SubmissionPipeline {
    /// Creates a pipeline.
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialProvider>,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            credentials,
            notifier,
            navigator,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns whether a submission is running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submits the view's current data to `endpoint`.
    pub async fn submit<V>(
        &self,
        view: &mut V,
        endpoint: &str,
        config: &SubmitConfig,
    ) -> SubmissionOutcome
    where
        V: FormView + SubmitControl + ?Sized,
    {
        let data = view.form_data();
        self.submit_data(view, data, endpoint, config).await
    }

    /// Submits an already collected snapshot of the view's data.
    pub async fn submit_data<V>(
        &self,
        view: &mut V,
        data: FormData,
        endpoint: &str,
        config: &SubmitConfig,
    ) -> SubmissionOutcome
    where
        V: SubmitControl + ?Sized,
    {
        let Some(flight) = InFlight::acquire(&self.in_flight) else {
            warn!(endpoint, "Submission already in flight");
            return SubmissionOutcome::InFlight;
        };

        if !config.should_submit(&data) {
            debug!(endpoint, "Submission aborted by pre-submit guard");
            return SubmissionOutcome::Aborted;
        }

        let result = {
            let _busy = BusyControl::engage(view, &config.busy_label);
            self.exchange(data, endpoint, config).await
        };

        match result {
            Ok(data) => {
                info!(endpoint, "Form submitted");
                self.notifier
                    .notify(Notification::success(SUCCESS_TITLE, &config.success_message));
                self.schedule_redirect(&data, config, flight);
                SubmissionOutcome::Success { data }
            }
            Err(error) => {
                warn!(endpoint, error = %error, "Form submission failed");
                self.notifier
                    .notify(Notification::error(ERROR_TITLE, &config.error_message));
                SubmissionOutcome::Failure { error }
            }
        }
    }

    /// Wraps this pipeline as a form controller submit handler.
    pub fn handler(
        &self,
        endpoint: impl Into<String>,
        config: SubmitConfig,
    ) -> PipelineHandler<'_> {
        PipelineHandler {
            pipeline: self,
            endpoint: endpoint.into(),
            config,
        }
    }

    async fn exchange(
        &self,
        data: FormData,
        endpoint: &str,
        config: &SubmitConfig,
    ) -> Result<Value> {
        let mut request = Request::from_form(config.method, endpoint, &data)
            .header("Accept", "application/json")
            .header("X-Requested-With", "XMLHttpRequest");
        if let Some(token) = self.credentials.token() {
            request = request.header(CSRF_HEADER, token);
        }

        info!(method = %config.method, endpoint, fields = data.len(), "Submitting form");
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(SubmitError::Status {
                status: response.status,
                reason: response.reason().to_string(),
            });
        }

        Ok(response.json()?)
    }

    fn schedule_redirect(&self, data: &Value, config: &SubmitConfig, flight: InFlight) {
        let Some(target) = config.redirect.as_ref().and_then(|r| r.target(data)) else {
            return;
        };

        let navigator = Arc::clone(&self.navigator);
        let delay = config.redirect_delay;
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    debug!(target = %target, "Navigating after submission");
                    navigator.navigate(&target);
                    drop(flight);
                });
            }
            Err(_) => {
                warn!(target = %target, "No async runtime, navigating without delay");
                navigator.navigate(&target);
            }
        }
    }
}

impl std::fmt::Debug for SubmissionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionPipeline")
            .field("in_flight", &self.is_in_flight())
            .finish_non_exhaustive()
    }
}

/// Held while a submission or its pending redirect runs.
struct InFlight {
    flag: Arc<AtomicBool>,
}

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Keeps the submit control disabled; restores its label when dropped.
struct BusyControl<'a, V: SubmitControl + ?Sized> {
    view: &'a mut V,
    label: Option<String>,
}

impl<'a, V: SubmitControl + ?Sized> BusyControl<'a, V> {
    fn engage(view: &'a mut V, busy_label: &str) -> Self {
        let label = view.submit_label();
        if label.is_some() {
            view.set_submit_state(true, busy_label);
        }
        Self { view, label }
    }
}

impl<V: SubmitControl + ?Sized> Drop for BusyControl<'_, V> {
    fn drop(&mut self) {
        if let Some(label) = self.label.take() {
            self.view.set_submit_state(false, &label);
        }
    }
}

/// A [`SubmissionPipeline`] bound to one endpoint, usable as a
/// [`SubmitHandler`] for [`medform::FormController::submit_with`].
#[derive(Debug)]
pub struct PipelineHandler<'p> {
    pipeline: &'p SubmissionPipeline,
    endpoint: String,
    config: SubmitConfig,
}

impl<V: SubmitControl + ?Sized> SubmitHandler<V> for PipelineHandler<'_> {
    type Output = SubmissionOutcome;

    fn handle<'a>(&'a self, view: &'a mut V, data: FormData) -> LocalBoxFuture<'a, Self::Output> {
        Box::pin(
            self.pipeline
                .submit_data(view, data, &self.endpoint, &self.config),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medform::HtmlForm;

    #[test]
    fn test_in_flight_guard() {
        let flag = Arc::new(AtomicBool::new(false));
        let guard = InFlight::acquire(&flag);
        assert!(guard.is_some());
        assert!(InFlight::acquire(&flag).is_none());
        drop(guard);
        assert!(InFlight::acquire(&flag).is_some());
    }

    #[test]
    fn test_busy_control_restores_label() {
        let mut form = HtmlForm::new("f").submit_button("Save");
        {
            let busy = BusyControl::engage(&mut form, "Submitting...");
            let button = busy.view.button().unwrap();
            assert!(button.disabled);
            assert_eq!(button.label, "Submitting...");
        }
        let button = form.button().unwrap();
        assert!(!button.disabled);
        assert_eq!(button.label, "Save");
    }

    #[test]
    fn test_busy_control_without_button() {
        let mut form = HtmlForm::new("f");
        drop(BusyControl::engage(&mut form, "Submitting..."));
        assert!(form.button().is_none());
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = SubmissionOutcome::Success {
            data: serde_json::json!({"ok": true}),
        };
        assert!(outcome.is_success());
        assert!(outcome.data().is_some());
        assert!(outcome.error().is_none());

        let outcome = SubmissionOutcome::Failure {
            error: SubmitError::Timeout,
        };
        assert!(!outcome.is_success());
        assert!(matches!(outcome.error(), Some(SubmitError::Timeout)));
    }
}
