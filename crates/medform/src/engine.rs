//! Form validation engine.
//!
//! [`FormValidator`] is the pure part: it turns submitted data into an
//! [`ErrorMap`]. [`FormController`] drives a [`FormView`] through a submit
//! attempt: validate, render errors or hand the data to a submit handler.

use std::sync::Arc;

use futures::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::data::FormData;
use crate::error::{ErrorMap, FormError, Result};
use crate::evaluator::RuleEvaluator;
use crate::notify::{Notification, NotificationSink};
use crate::registry::ValidatorRegistry;
use crate::rules::{FormRules, MessageTable};
use crate::view::FormView;

/// Title of the notification shown when validation blocks a submission.
pub const VALIDATION_FAILED_TITLE: &str = "Form validation failed";

/// What to do with rule names missing from the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownRulePolicy {
    /// Refuse to build the validator.
    #[default]
    Reject,
    /// Accept the declaration; unknown rules are always satisfied.
    FailOpen,
}

/// Validates submitted data against a form's rules.
#[derive(Debug, Clone)]
pub struct FormValidator {
    registry: Arc<ValidatorRegistry>,
    rules: FormRules,
    messages: MessageTable,
}

impl FormValidator {
    /// Creates a validator, rejecting rules missing from the registry.
    pub fn new(
        registry: Arc<ValidatorRegistry>,
        rules: FormRules,
        messages: MessageTable,
    ) -> Result<Self> {
        Self::builder(registry)
            .rules(rules)
            .messages(messages)
            .build()
    }

    /// Starts building a validator.
    pub fn builder(registry: Arc<ValidatorRegistry>) -> FormValidatorBuilder {
        FormValidatorBuilder {
            registry,
            rules: FormRules::new(),
            messages: MessageTable::new(),
            policy: UnknownRulePolicy::default(),
        }
    }

    /// Returns the declared rules.
    pub const fn rules(&self) -> &FormRules {
        &self.rules
    }

    /// Validates every declared field once. Undeclared fields are ignored.
    pub fn validate(&self, data: &FormData) -> ErrorMap {
        let evaluator = RuleEvaluator::new(&self.registry);
        let mut errors = ErrorMap::new();

        for (field, spec) in self.rules.iter() {
            if let Some(message) = evaluator.evaluate(field, data.get(field), spec, &self.messages)
            {
                errors.insert(field, message);
            }
        }

        debug!(
            fields = self.rules.len(),
            errors = errors.len(),
            "Validated form data"
        );
        errors
    }
}

/// Builder for [`FormValidator`].
#[derive(Debug)]
pub struct FormValidatorBuilder {
    registry: Arc<ValidatorRegistry>,
    rules: FormRules,
    messages: MessageTable,
    policy: UnknownRulePolicy,
}

impl FormValidatorBuilder {
    /// Sets the field rules.
    #[must_use]
    pub fn rules(mut self, rules: FormRules) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the message overrides.
    #[must_use]
    pub fn messages(mut self, messages: MessageTable) -> Self {
        self.messages = messages;
        self
    }

    /// Sets the policy for rule names missing from the registry.
    #[must_use]
    pub const fn unknown_rules(mut self, policy: UnknownRulePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Checks every referenced rule name and builds the validator.
    pub fn build(self) -> Result<FormValidator> {
        for (field, spec) in self.rules.iter() {
            for rule in spec.rule_names() {
                if self.registry.has(rule) {
                    continue;
                }
                match self.policy {
                    UnknownRulePolicy::Reject => {
                        return Err(FormError::UnknownRule {
                            field: field.to_string(),
                            rule: rule.to_string(),
                        });
                    }
                    UnknownRulePolicy::FailOpen => {
                        warn!(
                            field = %field,
                            rule = %rule,
                            "Unknown validator will always pass"
                        );
                    }
                }
            }
        }

        Ok(FormValidator {
            registry: self.registry,
            rules: self.rules,
            messages: self.messages,
        })
    }
}

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    /// Waiting for a submit.
    #[default]
    Idle,
    /// Checking fields.
    Validating,
    /// Last attempt had errors.
    Blocked,
    /// Handing data to the submit handler.
    Submitting,
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAttempt<T = ()> {
    /// Validation failed; nothing was submitted.
    Blocked(ErrorMap),
    /// No handler: the form was submitted the standard way.
    Native,
    /// The submit handler ran and returned this.
    Handled(T),
}

impl<T> SubmitAttempt<T> {
    /// Returns the errors of a blocked attempt.
    pub const fn errors(&self) -> Option<&ErrorMap> {
        match self {
            Self::Blocked(errors) => Some(errors),
            Self::Native | Self::Handled(_) => None,
        }
    }

    /// Returns whether validation blocked the attempt.
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

/// Takes over submission of a valid form.
pub trait SubmitHandler<V: ?Sized> {
    /// Value produced by a submission.
    type Output;

    /// Submits the form. `data` is the snapshot that passed validation.
    fn handle<'a>(&'a self, view: &'a mut V, data: FormData) -> LocalBoxFuture<'a, Self::Output>;
}

/// Drives submit attempts and field error state of one form.
#[derive(Debug)]
pub struct FormController {
    validator: FormValidator,
    phase: FormPhase,
    errors: ErrorMap,
}

impl FormController {
    /// Creates a controller for a form.
    pub fn new(validator: FormValidator) -> Self {
        Self {
            validator,
            phase: FormPhase::Idle,
            errors: ErrorMap::new(),
        }
    }

    /// Returns the current phase.
    pub const fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Returns the errors of the last attempt.
    pub const fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Returns the validator.
    pub const fn validator(&self) -> &FormValidator {
        &self.validator
    }

    /// Handles a submit without a handler.
    ///
    /// A valid form falls back to the standard submission.
    pub fn submit<V: FormView + ?Sized>(
        &mut self,
        view: &mut V,
        notifier: &dyn NotificationSink,
    ) -> SubmitAttempt {
        match self.check(view, notifier) {
            Err(errors) => SubmitAttempt::Blocked(errors),
            Ok(_) => {
                view.submit_native();
                self.phase = FormPhase::Idle;
                SubmitAttempt::Native
            }
        }
    }

    /// Handles a submit, delegating a valid form to `handler`.
    pub async fn submit_with<V, H>(
        &mut self,
        view: &mut V,
        notifier: &dyn NotificationSink,
        handler: &H,
    ) -> SubmitAttempt<H::Output>
    where
        V: FormView + ?Sized,
        H: SubmitHandler<V> + ?Sized,
    {
        match self.check(view, notifier) {
            Err(errors) => SubmitAttempt::Blocked(errors),
            Ok(data) => {
                let output = handler.handle(view, data).await;
                self.phase = FormPhase::Idle;
                SubmitAttempt::Handled(output)
            }
        }
    }

    /// Handles an input event: clears that field's error state only.
    pub fn input<V: FormView + ?Sized>(&mut self, view: &mut V, field: &str) {
        self.errors.remove(field);
        view.clear_field_error(field);
    }

    fn check<V: FormView + ?Sized>(
        &mut self,
        view: &mut V,
        notifier: &dyn NotificationSink,
    ) -> std::result::Result<FormData, ErrorMap> {
        self.phase = FormPhase::Validating;
        let data = view.form_data();
        let errors = self.validator.validate(&data);

        // Fields that were errored last time but pass now lose their state.
        for (field, _) in self.errors.iter() {
            if errors.get(field).is_none() {
                view.clear_field_error(field);
            }
        }
        self.errors = errors.clone();

        let Some((first_field, first_message)) = errors.first() else {
            self.phase = FormPhase::Submitting;
            return Ok(data);
        };

        notifier.notify(Notification::error(VALIDATION_FAILED_TITLE, first_message));
        for (field, message) in errors.iter() {
            view.show_field_error(field, message);
        }
        view.focus(first_field);

        debug!(first = %first_field, errors = errors.len(), "Submission blocked");
        self.phase = FormPhase::Blocked;
        Err(errors)
    }
}
