//! Validation and coercion of submitted forms
//!
//! Field rules are declared once in a table ([`rules::Schema`]) and evaluated
//! uniformly. Every failing field is reported, never just the first.

pub mod extractor;
pub mod invoice;
pub mod rules;
pub mod validators;

pub use extractor::FormFields;
pub use invoice::{FormIntent, INVOICE_FORM, ValidationResult, validate_invoice_form};
pub use rules::{Check, Coerce, FieldRule, FieldValue, Schema};

use serde::Serialize;
use std::collections::BTreeMap;

/// Per-field error messages, in the order they were raised
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn extend(&mut self, field: &str, messages: impl IntoIterator<Item = String>) {
        for message in messages {
            self.push(field, message);
        }
    }

    /// Messages for one field, if it failed
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// The invalid half of a validation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub errors: FieldErrors,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors,
            message: message.into(),
        }
    }
}
