//! Resolution of a field's rules into at most one error.

use crate::registry::ValidatorRegistry;
use crate::rules::{default_message, MessageTable, RuleParam, RuleSpec};

/// Evaluates rule specifications against a registry.
#[derive(Debug, Clone, Copy)]
pub struct RuleEvaluator<'a> {
    registry: &'a ValidatorRegistry,
}

impl<'a> RuleEvaluator<'a> {
    /// Creates an evaluator backed by `registry`.
    pub const fn new(registry: &'a ValidatorRegistry) -> Self {
        Self { registry }
    }

    /// Evaluates one field and returns its error message, if any.
    ///
    /// Mapping-style rules run in declaration order and stop at the first
    /// failure; disabled flags are skipped.
    pub fn evaluate(
        &self,
        field: &str,
        value: Option<&str>,
        spec: &RuleSpec,
        messages: &MessageTable,
    ) -> Option<String> {
        match spec {
            RuleSpec::Single(rule) => {
                if self.registry.evaluate(rule, value, &RuleParam::Flag(true)) {
                    None
                } else {
                    Some(
                        messages
                            .field_message(field)
                            .map_or_else(|| default_message(field), str::to_string),
                    )
                }
            }
            RuleSpec::Rules(rules) => rules
                .iter()
                .filter(|(_, param)| !param.is_disabled())
                .find(|(rule, param)| !self.registry.evaluate(rule, value, param))
                .map(|(rule, _)| {
                    messages
                        .rule_message(field, rule)
                        .map_or_else(|| default_message(field), str::to_string)
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn registry() -> ValidatorRegistry {
        ValidatorRegistry::with_builtins()
    }

    #[test]
    fn test_single_rule_uses_field_message() {
        let registry = registry();
        let evaluator = RuleEvaluator::new(&registry);
        let messages = MessageTable::new().field("name", "Please enter a name");

        let error = evaluator.evaluate("name", Some(""), &"required".into(), &messages);
        assert_eq!(error.as_deref(), Some("Please enter a name"));

        let error = evaluator.evaluate("name", Some("Li"), &"required".into(), &messages);
        assert_eq!(error, None);
    }

    #[test]
    fn test_single_rule_default_message() {
        let registry = registry();
        let evaluator = RuleEvaluator::new(&registry);

        let error = evaluator.evaluate("addr", Some("bad"), &"email".into(), &MessageTable::new());
        assert_eq!(error, Some(default_message("addr")));
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let registry = registry();
        let evaluator = RuleEvaluator::new(&registry);
        let spec = RuleSpec::rules()
            .rule("minLength", 5)
            .rule("email", true);
        let messages = MessageTable::new()
            .rule("addr", "minLength", "Too short")
            .rule("addr", "email", "Not an email");

        let error = evaluator.evaluate("addr", Some("ab"), &spec, &messages);
        assert_eq!(error.as_deref(), Some("Too short"));

        let error = evaluator.evaluate("addr", Some("abcdef"), &spec, &messages);
        assert_eq!(error.as_deref(), Some("Not an email"));
    }

    #[test]
    fn test_rule_message_falls_back_to_default() {
        let registry = registry();
        let evaluator = RuleEvaluator::new(&registry);
        let spec = RuleSpec::rules().rule("required", true);
        let messages = MessageTable::new().field("name", "field-level only");

        let error = evaluator.evaluate("name", None, &spec, &messages);
        assert_eq!(error, Some(default_message("name")));
    }

    #[test]
    fn test_short_circuit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = registry().with("counted", move |_: Option<&str>, _: &RuleParam| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        let evaluator = RuleEvaluator::new(&registry);
        let spec = RuleSpec::rules()
            .rule("required", true)
            .rule("counted", true);

        let _ = evaluator.evaluate("name", Some(""), &spec, &MessageTable::new());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let _ = evaluator.evaluate("name", Some("x"), &spec, &MessageTable::new());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disabled_flag_is_skipped() {
        let registry = registry();
        let evaluator = RuleEvaluator::new(&registry);
        let spec = RuleSpec::rules().rule("required", false);

        assert_eq!(
            evaluator.evaluate("note", Some(""), &spec, &MessageTable::new()),
            None
        );
    }

    #[test]
    fn test_parameter_is_passed() {
        let registry = registry();
        let evaluator = RuleEvaluator::new(&registry);
        let spec = RuleSpec::rules().rule("range", (1.0, 10.0));

        assert_eq!(
            evaluator.evaluate("dose", Some("5"), &spec, &MessageTable::new()),
            None
        );
        assert!(evaluator
            .evaluate("dose", Some("11"), &spec, &MessageTable::new())
            .is_some());
    }
}
