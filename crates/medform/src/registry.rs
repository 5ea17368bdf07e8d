//! Named validator predicates.

use std::collections::HashMap;
use std::sync::Arc;

use crate::builtins;
use crate::rules::RuleParam;

/// Trait for validator predicates.
///
/// A validator is a pure test of one value against one rule. `value` is
/// `None` when the field is absent from the submitted data. Parameterless
/// rules receive [`RuleParam::Flag`]`(true)`.
pub trait Validator: Send + Sync {
    /// Returns whether the value satisfies the rule.
    fn check(&self, value: Option<&str>, param: &RuleParam) -> bool;
}

impl<F> Validator for F
where
    F: Fn(Option<&str>, &RuleParam) -> bool + Send + Sync,
{
    fn check(&self, value: Option<&str>, param: &RuleParam) -> bool {
        self(value, param)
    }
}

/// Registry of validators keyed by name.
///
/// Construct one per application (or per test), populate it, then share it
/// read-only, typically behind an [`Arc`].
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn Validator>>,
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.names();
        names.sort_unstable();
        f.debug_struct("ValidatorRegistry")
            .field("validators", &names)
            .finish()
    }
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in validator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Adds a validator, replacing any existing one with the same name.
    pub fn register(&mut self, name: impl Into<String>, validator: impl Validator + 'static) {
        self.validators.insert(name.into(), Arc::new(validator));
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, validator: impl Validator + 'static) -> Self {
        self.register(name, validator);
        self
    }

    /// Returns whether a validator is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Returns the registered names.
    pub fn names(&self) -> Vec<&str> {
        self.validators.keys().map(String::as_str).collect()
    }

    /// Evaluates a validator.
    ///
    /// Unknown names are satisfied. Form construction rejects them up front
    /// unless the form opted into [`UnknownRulePolicy::FailOpen`].
    ///
    /// [`UnknownRulePolicy::FailOpen`]: crate::UnknownRulePolicy::FailOpen
    pub fn evaluate(&self, name: &str, value: Option<&str>, param: &RuleParam) -> bool {
        match self.validators.get(name) {
            Some(validator) => validator.check(value, param),
            None => {
                tracing::trace!(rule = %name, "Unknown validator treated as satisfied");
                true
            }
        }
    }
}
