//! # medform-submit
//!
//! Asynchronous submission of validated forms.
//!
//! This crate provides:
//! - A submission pipeline performing one JSON exchange per submit
//! - Anti-forgery token lookup from cookies
//! - A `reqwest` transport, replaceable through the [`Transport`] trait
//! - Success and failure notifications, and delayed navigation
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use medform::{
//!     FormController, FormRules, FormValidator, HtmlField, HtmlForm, MessageTable,
//!     NotificationBoard, SubmitAttempt, ValidatorRegistry,
//! };
//! use medform_submit::{
//!     CookieCredentials, HttpTransport, Redirect, SubmissionOutcome, SubmissionPipeline,
//!     SubmitConfig,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = FormValidator::new(
//!     Arc::new(ValidatorRegistry::with_builtins()),
//!     FormRules::new().field("name", "required"),
//!     MessageTable::new(),
//! )?;
//! let mut controller = FormController::new(validator);
//! let mut form = HtmlForm::new("patient")
//!     .field(HtmlField::new("name", "Name").value("Li Lei"))
//!     .submit_button("Save");
//!
//! let notifications = Arc::new(NotificationBoard::new());
//! let pipeline = SubmissionPipeline::new(
//!     Arc::new(HttpTransport::new()),
//!     Arc::new(CookieCredentials::new("csrftoken=abc123")),
//!     notifications.clone(),
//!     Arc::new(|url: &str| println!("navigate to {url}")),
//! );
//! let handler = pipeline.handler(
//!     "https://records.example/patients/new/",
//!     SubmitConfig::new().redirect(Redirect::response_field("redirect_url")),
//! );
//!
//! let attempt = controller
//!     .submit_with(&mut form, notifications.as_ref(), &handler)
//!     .await;
//! if let SubmitAttempt::Handled(SubmissionOutcome::Success { data }) = attempt {
//!     println!("saved: {data}");
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod credentials;
mod error;
mod navigation;
mod pipeline;
mod request;
mod response;
mod transport;

pub use config::{
    SubmitConfig, SubmitSettings, DEFAULT_BUSY_LABEL, DEFAULT_ERROR_MESSAGE,
    DEFAULT_REDIRECT_DELAY, DEFAULT_SUCCESS_MESSAGE, ERROR_TITLE, SUCCESS_TITLE,
};
pub use credentials::{
    CookieCredentials, CredentialProvider, StaticCredentials, CSRF_COOKIE, CSRF_HEADER,
};
pub use error::{Result, SubmitError};
pub use navigation::{Navigator, Redirect};
pub use pipeline::{PipelineHandler, SubmissionOutcome, SubmissionPipeline};
pub use request::{Body, Method, Request};
pub use response::Response;
pub use transport::{BoxFuture, HttpTransport, Transport};
