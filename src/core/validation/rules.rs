//! Declarative field rules
//!
//! A [`Schema`] is a static table of [`FieldRule`]s. Evaluating it against a
//! submitted form either yields every coerced value or the errors of every
//! failing field.

use super::FieldErrors;
use super::extractor::FormFields;
use super::validators;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A coerced field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
}

impl FieldValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }

    pub fn into_number(self) -> Option<Decimal> {
        match self {
            FieldValue::Number(n) => Some(n),
            FieldValue::Text(_) => None,
        }
    }
}

/// How raw form text becomes a typed value
#[derive(Debug, Clone, Copy)]
pub enum Coerce {
    /// Keep the trimmed text
    Text,
    /// Parse as an exact decimal; `invalid` is reported when parsing fails
    Number { invalid: &'static str },
}

/// A predicate on a coerced value, with the message reported on failure
#[derive(Debug, Clone, Copy)]
pub enum Check {
    NonEmpty(&'static str),
    GreaterThan(Decimal, &'static str),
    OneOf(&'static [&'static str], &'static str),
    MinorUnits {
        zero: &'static str,
        overflow: &'static str,
    },
}

impl Check {
    /// Run the check. Text checks ignore numbers and vice versa.
    pub fn apply(&self, value: &FieldValue) -> Result<(), String> {
        match (self, value) {
            (Check::NonEmpty(msg), FieldValue::Text(s)) => validators::non_empty(s, msg),
            (Check::OneOf(allowed, msg), FieldValue::Text(s)) => {
                validators::one_of(s, allowed, msg)
            }
            (Check::GreaterThan(bound, msg), FieldValue::Number(n)) => {
                validators::greater_than(*n, *bound, msg)
            }
            (Check::MinorUnits { zero, overflow }, FieldValue::Number(n)) => {
                validators::minor_units(*n, zero, overflow)
            }
            _ => Ok(()),
        }
    }
}

/// Rule for one form field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Form key
    pub name: &'static str,
    /// Reported when the key is absent
    pub missing: &'static str,
    pub coerce: Coerce,
    /// Evaluated in order; every failure is reported
    pub checks: &'static [Check],
}

impl FieldRule {
    /// Coerce and check one raw value, collecting every message.
    pub fn evaluate(&self, raw: Option<&str>) -> Result<FieldValue, Vec<String>> {
        let Some(raw) = raw else {
            return Err(vec![self.missing.to_string()]);
        };

        let raw = raw.trim();
        let value = match self.coerce {
            Coerce::Text => FieldValue::Text(raw.to_string()),
            Coerce::Number { invalid } => match validators::coerce_number(raw) {
                Some(n) => FieldValue::Number(n),
                None => return Err(vec![invalid.to_string()]),
            },
        };

        let mut messages = Vec::new();
        for check in self.checks {
            if let Err(msg) = check.apply(&value) {
                // Two checks may share a message; report it once.
                if !messages.contains(&msg) {
                    messages.push(msg);
                }
            }
        }

        if messages.is_empty() {
            Ok(value)
        } else {
            Err(messages)
        }
    }
}

/// A static table of field rules for one entity shape
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    rules: &'static [FieldRule],
}

impl Schema {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&'static FieldRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Evaluate every rule. Keys not named by a rule are ignored.
    pub fn evaluate(
        &self,
        fields: &FormFields,
    ) -> Result<BTreeMap<&'static str, FieldValue>, FieldErrors> {
        let mut values = BTreeMap::new();
        let mut errors = FieldErrors::new();

        for rule in self.rules {
            match rule.evaluate(fields.get(rule.name)) {
                Ok(value) => {
                    values.insert(rule.name, value);
                }
                Err(messages) => errors.extend(rule.name, messages),
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }
}
