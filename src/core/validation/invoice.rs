//! The invoice form schema

use super::extractor::FormFields;
use super::rules::{Check, Coerce, FieldRule, Schema};
use super::{FieldErrors, ValidationFailure};
use crate::core::invoice::{InvoiceDraft, InvoiceStatus};
use rust_decimal::Decimal;

pub const CUSTOMER_ID: &str = "customerId";
pub const AMOUNT: &str = "amount";
pub const STATUS: &str = "status";

const SELECT_CUSTOMER: &str = "please select a customer";
const AMOUNT_POSITIVE: &str = "amount must be greater than 0";

/// Field rules shared by create and update
pub const INVOICE_FORM: Schema = Schema::new(&[
    FieldRule {
        name: CUSTOMER_ID,
        missing: SELECT_CUSTOMER,
        coerce: Coerce::Text,
        checks: &[Check::NonEmpty(SELECT_CUSTOMER)],
    },
    FieldRule {
        name: AMOUNT,
        // An absent amount coerces to zero.
        missing: AMOUNT_POSITIVE,
        coerce: Coerce::Number {
            invalid: "amount must be a number",
        },
        checks: &[
            Check::GreaterThan(Decimal::ZERO, AMOUNT_POSITIVE),
            Check::MinorUnits {
                zero: AMOUNT_POSITIVE,
                overflow: "amount is too large",
            },
        ],
    },
    FieldRule {
        name: STATUS,
        missing: "status is required",
        coerce: Coerce::Text,
        checks: &[Check::OneOf(InvoiceStatus::ALL, "please select a status")],
    },
]);

/// `Ok` carries the draft, `Err` every field error plus the overall message
pub type ValidationResult = Result<InvoiceDraft, ValidationFailure>;

/// Which action the form was submitted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormIntent {
    Create,
    Update,
}

impl FormIntent {
    pub fn failure_message(&self) -> &'static str {
        match self {
            FormIntent::Create => "missing fields, cannot create",
            FormIntent::Update => "missing fields, cannot update",
        }
    }
}

/// Validate a submitted invoice form. Pure; performs no I/O.
pub fn validate_invoice_form(fields: &FormFields, intent: FormIntent) -> ValidationResult {
    let failure = |errors| ValidationFailure::new(errors, intent.failure_message());

    let mut values = INVOICE_FORM.evaluate(fields).map_err(failure)?;

    let draft = (|| {
        Some(InvoiceDraft {
            customer_id: values.remove(CUSTOMER_ID)?.into_text()?,
            amount: values.remove(AMOUNT)?.into_number()?,
            status: values.remove(STATUS)?.into_text()?.parse().ok()?,
        })
    })();

    draft.ok_or_else(|| failure(FieldErrors::new()))
}
