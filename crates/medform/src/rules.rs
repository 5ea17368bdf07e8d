//! Rule specifications and message tables.
//!
//! Rules are declared per field, either as a single validator name or as an
//! ordered mapping from validator name to parameter:
//!
//! ```rust
//! use medform::rules::{FormRules, RuleSpec};
//!
//! let rules = FormRules::new()
//!     .field("name", "required")
//!     .field(
//!         "age",
//!         RuleSpec::rules()
//!             .rule("required", true)
//!             .rule("range", (0.0, 150.0)),
//!     );
//!
//! assert_eq!(rules.len(), 2);
//! ```
//!
//! The same declaration can be loaded from JSON. Key order is preserved.
//!
//! ```rust
//! use medform::rules::FormRules;
//!
//! let rules = FormRules::from_json(
//!     r#"{"name": "required", "age": {"required": true, "range": [0, 150]}}"#,
//! )
//! .unwrap();
//! assert_eq!(rules.field_names(), vec!["name", "age"]);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::Result;

/// Parameter attached to a rule in a mapping-style specification.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleParam {
    /// Parameterless rule. `true` enables it, `false` skips it.
    Flag(bool),
    /// Numeric bound, e.g. `minLength: 3`.
    Number(f64),
    /// Text parameter.
    Text(String),
    /// Inclusive numeric interval, declared as `[min, max]` or
    /// `{"min": .., "max": ..}`.
    Range { min: f64, max: f64 },
}

impl RuleParam {
    /// Returns the parameter as a number.
    ///
    /// Numeric text is accepted.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Flag(_) | Self::Range { .. } => None,
        }
    }

    /// Returns the parameter as an inclusive interval.
    pub const fn as_range(&self) -> Option<(f64, f64)> {
        match self {
            Self::Range { min, max } => Some((*min, *max)),
            _ => None,
        }
    }

    /// Returns whether this is a disabled flag.
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Flag(false))
    }
}

impl<'de> Deserialize<'de> for RuleParam {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RuleParamVisitor;

        impl<'de> Visitor<'de> for RuleParamVisitor {
            type Value = RuleParam;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flag, a number, a string, [min, max] or {\"min\", \"max\"}")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<RuleParam, E> {
                Ok(RuleParam::Flag(v))
            }

            #[allow(clippy::cast_precision_loss)]
            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<RuleParam, E> {
                Ok(RuleParam::Number(v as f64))
            }

            #[allow(clippy::cast_precision_loss)]
            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<RuleParam, E> {
                Ok(RuleParam::Number(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<RuleParam, E> {
                Ok(RuleParam::Number(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<RuleParam, E> {
                Ok(RuleParam::Text(v.to_string()))
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<RuleParam, A::Error> {
                let min: f64 = seq
                    .next_element()?
                    .ok_or_else(|| <A::Error as de::Error>::invalid_length(0, &self))?;
                let max: f64 = seq
                    .next_element()?
                    .ok_or_else(|| <A::Error as de::Error>::invalid_length(1, &self))?;
                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(3, &self));
                }
                Ok(RuleParam::Range { min, max })
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<RuleParam, A::Error> {
                let mut min = None;
                let mut max = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "min" => min = Some(map.next_value::<f64>()?),
                        "max" => max = Some(map.next_value::<f64>()?),
                        other => return Err(de::Error::unknown_field(other, &["min", "max"])),
                    }
                }
                let min = min.ok_or_else(|| <A::Error as de::Error>::missing_field("min"))?;
                let max = max.ok_or_else(|| <A::Error as de::Error>::missing_field("max"))?;
                Ok(RuleParam::Range { min, max })
            }
        }

        deserializer.deserialize_any(RuleParamVisitor)
    }
}

impl From<bool> for RuleParam {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<f64> for RuleParam {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RuleParam {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for RuleParam {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<usize> for RuleParam {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for RuleParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<(f64, f64)> for RuleParam {
    fn from((min, max): (f64, f64)) -> Self {
        Self::Range { min, max }
    }
}

/// Rules declared for a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSpec {
    /// A single parameterless validator.
    Single(String),
    /// Validators with parameters, evaluated in declaration order.
    Rules(Vec<(String, RuleParam)>),
}

impl RuleSpec {
    /// Starts an empty mapping-style specification.
    pub const fn rules() -> Self {
        Self::Rules(Vec::new())
    }

    /// Appends a rule to a mapping-style specification.
    ///
    /// A single-name specification is promoted to a mapping with the
    /// existing name enabled first.
    #[must_use]
    pub fn rule(self, name: impl Into<String>, param: impl Into<RuleParam>) -> Self {
        let mut rules = match self {
            Self::Single(existing) => vec![(existing, RuleParam::Flag(true))],
            Self::Rules(rules) => rules,
        };
        rules.push((name.into(), param.into()));
        Self::Rules(rules)
    }

    /// Returns every validator name referenced by this specification.
    pub fn rule_names(&self) -> Vec<&str> {
        match self {
            Self::Single(name) => vec![name.as_str()],
            Self::Rules(rules) => rules.iter().map(|(name, _)| name.as_str()).collect(),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(name: &str) -> Self {
        Self::Single(name.to_string())
    }
}

impl From<String> for RuleSpec {
    fn from(name: String) -> Self {
        Self::Single(name)
    }
}

impl<'de> Deserialize<'de> for RuleSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RuleSpecVisitor;

        impl<'de> Visitor<'de> for RuleSpecVisitor {
            type Value = RuleSpec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a validator name or a map of validator names to parameters")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<RuleSpec, E> {
                Ok(RuleSpec::Single(v.to_string()))
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<RuleSpec, A::Error> {
                let mut rules = Vec::new();
                while let Some((name, param)) = map.next_entry::<String, RuleParam>()? {
                    rules.push((name, param));
                }
                Ok(RuleSpec::Rules(rules))
            }
        }

        deserializer.deserialize_any(RuleSpecVisitor)
    }
}

/// Rules for every validated field of a form, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormRules {
    fields: Vec<(String, RuleSpec)>,
}

impl FormRules {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares rules for a field.
    ///
    /// Redeclaring a field replaces its rules but keeps its position.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<RuleSpec>) -> Self {
        let name = name.into();
        let spec = spec.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = spec;
        } else {
            self.fields.push((name, spec));
        }
        self
    }

    /// Parses rules from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the rules of a field.
    pub fn get(&self, field: &str) -> Option<&RuleSpec> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, spec)| spec)
    }

    /// Iterates over `(field, spec)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Returns the declared field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'de> Deserialize<'de> for FormRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FormRulesVisitor;

        impl<'de> Visitor<'de> for FormRulesVisitor {
            type Value = FormRules;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to rule specifications")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<FormRules, A::Error> {
                let mut rules = FormRules::new();
                while let Some((field, spec)) = map.next_entry::<String, RuleSpec>()? {
                    rules = rules.field(field, spec);
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(FormRulesVisitor)
    }
}

/// Message override for one field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MessageEntry {
    /// Used when the field has a single-name specification.
    Field(String),
    /// Keyed by rule name, used for mapping-style specifications.
    PerRule(HashMap<String, String>),
}

/// Human-readable overrides for validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MessageTable {
    entries: HashMap<String, MessageEntry>,
}

impl MessageTable {
    /// Creates an empty message table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field-level message.
    #[must_use]
    pub fn field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.entries
            .insert(field.into(), MessageEntry::Field(message.into()));
        self
    }

    /// Sets the message for one rule of a field.
    #[must_use]
    pub fn rule(
        mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let entry = self
            .entries
            .entry(field.into())
            .or_insert_with(|| MessageEntry::PerRule(HashMap::new()));
        if let MessageEntry::Field(_) = entry {
            *entry = MessageEntry::PerRule(HashMap::new());
        }
        if let MessageEntry::PerRule(rules) = entry {
            rules.insert(rule.into(), message.into());
        }
        self
    }

    /// Parses a message table from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the field-level override.
    pub fn field_message(&self, field: &str) -> Option<&str> {
        match self.entries.get(field)? {
            MessageEntry::Field(message) => Some(message),
            MessageEntry::PerRule(_) => None,
        }
    }

    /// Returns the `{field}.{rule}` override.
    pub fn rule_message(&self, field: &str, rule: &str) -> Option<&str> {
        match self.entries.get(field)? {
            MessageEntry::PerRule(rules) => rules.get(rule).map(String::as_str),
            MessageEntry::Field(_) => None,
        }
    }
}

/// Returns the generated message for a field without an override.
pub fn default_message(field: &str) -> String {
    format!("{field} failed validation.")
}
