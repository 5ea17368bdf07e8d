//! Submission configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use medform::FormData;
use serde::Deserialize;

use crate::error::{Result, SubmitError};
use crate::navigation::Redirect;
use crate::request::Method;

/// Title of the notification shown after a successful submission.
pub const SUCCESS_TITLE: &str = "Success";

/// Title of the notification shown after a failed submission.
pub const ERROR_TITLE: &str = "Error";

/// Default success notification text.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Submitted successfully.";

/// Default failure notification text.
pub const DEFAULT_ERROR_MESSAGE: &str = "Submission failed.";

/// Default label of the submit control while a submission runs.
pub const DEFAULT_BUSY_LABEL: &str = "Submitting...";

/// Default wait between the success notification and navigation.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1000);

type Guard = Arc<dyn Fn(&FormData) -> bool + Send + Sync>;

/// How one form is submitted.
#[derive(Clone)]
pub struct SubmitConfig {
    /// HTTP method.
    pub method: Method,
    /// Success notification text.
    pub success_message: String,
    /// Failure notification text.
    pub error_message: String,
    /// Submit control label while busy.
    pub busy_label: String,
    /// Navigation after success.
    pub redirect: Option<Redirect>,
    /// Wait before navigating.
    pub redirect_delay: Duration,
    before_submit: Option<Guard>,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            method: Method::Post,
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            busy_label: DEFAULT_BUSY_LABEL.to_string(),
            redirect: None,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            before_submit: None,
        }
    }
}

impl SubmitConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub const fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the success notification text.
    #[must_use]
    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }

    /// Sets the failure notification text.
    #[must_use]
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    /// Sets the busy label.
    #[must_use]
    pub fn busy_label(mut self, label: impl Into<String>) -> Self {
        self.busy_label = label.into();
        self
    }

    /// Navigates after a successful submission.
    #[must_use]
    pub fn redirect(mut self, redirect: Redirect) -> Self {
        self.redirect = Some(redirect);
        self
    }

    /// Sets the wait before navigating.
    #[must_use]
    pub const fn redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Runs `guard` before anything else; returning `false` aborts the
    /// submission.
    #[must_use]
    pub fn before_submit<F>(mut self, guard: F) -> Self
    where
        F: Fn(&FormData) -> bool + Send + Sync + 'static,
    {
        self.before_submit = Some(Arc::new(guard));
        self
    }

    /// Returns whether the pre-submit guard lets `data` through.
    pub fn should_submit(&self, data: &FormData) -> bool {
        self.before_submit.as_ref().is_none_or(|guard| guard(data))
    }
}

impl fmt::Debug for SubmitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitConfig")
            .field("method", &self.method)
            .field("success_message", &self.success_message)
            .field("error_message", &self.error_message)
            .field("busy_label", &self.busy_label)
            .field("redirect", &self.redirect)
            .field("redirect_delay", &self.redirect_delay)
            .field("before_submit", &self.before_submit.is_some())
            .finish()
    }
}

/// Declarative submission settings, as embedded in page markup.
///
/// ```rust
/// use medform_submit::{Method, SubmitSettings};
///
/// let config = SubmitSettings::from_json(
///     r#"{"method": "put", "successMessage": "Saved.", "redirectField": "redirect_url"}"#,
/// )
/// .unwrap()
/// .into_config()
/// .unwrap();
/// assert_eq!(config.method, Method::Put);
/// assert_eq!(config.success_message, "Saved.");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitSettings {
    /// HTTP method name.
    pub method: Option<String>,
    /// Success notification text.
    pub success_message: Option<String>,
    /// Failure notification text.
    pub error_message: Option<String>,
    /// Submit control label while busy.
    pub busy_label: Option<String>,
    /// Fixed redirect URL.
    pub redirect: Option<String>,
    /// Response field holding the redirect URL. Ignored when `redirect` is set.
    pub redirect_field: Option<String>,
    /// Wait before navigating, in milliseconds.
    pub redirect_delay_ms: Option<u64>,
}

impl SubmitSettings {
    /// Parses settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts the settings into a [`SubmitConfig`].
    pub fn into_config(self) -> Result<SubmitConfig> {
        let mut config = SubmitConfig::new();

        if let Some(method) = self.method {
            config.method = method.parse()?;
        }
        if let Some(message) = self.success_message {
            config.success_message = message;
        }
        if let Some(message) = self.error_message {
            config.error_message = message;
        }
        if let Some(label) = self.busy_label {
            config.busy_label = label;
        }
        config.redirect = match (self.redirect, self.redirect_field) {
            (Some(url), _) => Some(Redirect::To(url)),
            (None, Some(field)) => Some(Redirect::response_field(field)),
            (None, None) => None,
        };
        if let Some(ms) = self.redirect_delay_ms {
            config.redirect_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

impl TryFrom<SubmitSettings> for SubmitConfig {
    type Error = SubmitError;

    fn try_from(settings: SubmitSettings) -> Result<Self> {
        settings.into_config()
    }
}
