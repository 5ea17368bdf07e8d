//! # medform
//!
//! Declarative form validation for the patient-records front end.
//!
//! This crate provides:
//! - A registry of named validators, with the built-in set
//! - Per-field rule declarations and message overrides
//! - A pure validation pass producing one message per errored field
//! - A controller rendering errors onto a form and gating submission
//! - An in-memory Bootstrap 5 form and a notification area
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use medform::{
//!     FormController, FormRules, FormValidator, HtmlField, HtmlForm, MessageTable,
//!     NotificationBoard, RuleSpec, SubmitAttempt, ValidatorRegistry,
//! };
//!
//! let registry = Arc::new(ValidatorRegistry::with_builtins());
//! let rules = FormRules::new()
//!     .field("name", "required")
//!     .field(
//!         "phone",
//!         RuleSpec::rules().rule("required", true).rule("phone", true),
//!     );
//! let messages = MessageTable::new()
//!     .field("name", "Please enter the patient's name.")
//!     .rule("phone", "phone", "Enter an 11 digit mobile number.");
//!
//! let validator = FormValidator::new(registry, rules, messages).unwrap();
//! let mut controller = FormController::new(validator);
//!
//! let mut form = HtmlForm::new("patient")
//!     .field(HtmlField::new("name", "Name"))
//!     .field(HtmlField::new("phone", "Phone").value("12345"))
//!     .submit_button("Save");
//! let notifications = NotificationBoard::new();
//!
//! let attempt = controller.submit(&mut form, &notifications);
//! assert!(attempt.is_blocked());
//! assert_eq!(form.focused(), Some("name"));
//! assert_eq!(form.feedback("phone"), Some("Enter an 11 digit mobile number."));
//!
//! form.input("name", "Li Lei");
//! form.input("phone", "13812345678");
//! assert_eq!(controller.submit(&mut form, &notifications), SubmitAttempt::Native);
//! ```
//!
//! ## Custom Validators
//!
//! ```rust
//! use medform::{RuleParam, ValidatorRegistry};
//!
//! let registry = ValidatorRegistry::with_builtins().with(
//!     "bloodType",
//!     |value: Option<&str>, _: &RuleParam| {
//!         matches!(value, Some("A" | "B" | "AB" | "O"))
//!     },
//! );
//! assert!(registry.evaluate("bloodType", Some("AB"), &RuleParam::Flag(true)));
//! ```

pub mod builtins;
mod data;
mod engine;
mod error;
pub mod evaluator;
pub mod html;
mod notify;
mod registry;
pub mod rules;
mod view;

pub use data::{FieldValue, FormData};
pub use engine::{
    FormController, FormPhase, FormValidator, FormValidatorBuilder, SubmitAttempt, SubmitHandler,
    UnknownRulePolicy, VALIDATION_FAILED_TITLE,
};
pub use error::{ErrorMap, FormError, Result};
pub use evaluator::RuleEvaluator;
pub use html::{HtmlField, HtmlForm, SelectedFile};
pub use notify::{
    Notification, NotificationBoard, NotificationKind, NotificationSink, DEFAULT_DURATION,
};
pub use registry::{Validator, ValidatorRegistry};
pub use rules::{FormRules, MessageEntry, MessageTable, RuleParam, RuleSpec};
pub use view::{FormView, SubmitControl};
