//! Form actions: the validated-mutation pipeline
//!
//! ```text
//! FormFields ──▶ validate_invoice_form ──▶ MutationExecutor ──▶ PostMutationEffects ──▶ ActionOutcome
//! ```
//!
//! Every expected outcome, including success, comes back as an
//! [`ActionOutcome`] value. A redirect is a variant, not an error, so no
//! error handler on the way out can swallow it.

pub mod authenticate;
pub mod effects;
pub mod executor;
pub mod invoices;

pub use authenticate::{AuthOutcome, INVALID_CREDENTIALS, SOMETHING_WENT_WRONG, authenticate};
pub use effects::{AfterSuccess, PostMutationEffects};
pub use executor::{MutationExecutor, MutationOutcome};
pub use invoices::InvoiceActions;

use crate::core::validation::{FieldErrors, ValidationFailure};
use serde::Serialize;

/// What a form re-renders with after a rejected submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionState {
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionState {
    /// State carrying only a banner message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: FieldErrors::new(),
            message: Some(message.into()),
        }
    }
}

impl From<ValidationFailure> for ActionState {
    fn from(failure: ValidationFailure) -> Self {
        Self {
            errors: failure.errors,
            message: Some(failure.message),
        }
    }
}

/// Result of running an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Write applied; navigate to `location`
    Redirect { location: String },
    /// Write applied; stay on the current view
    Done,
    /// Input rejected before any write
    Invalid(ActionState),
    /// Write attempted and failed; nothing changed
    Failed(ActionState),
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Redirect { .. } | ActionOutcome::Done)
    }

    /// The state to re-render with, if the action was rejected
    pub fn state(&self) -> Option<&ActionState> {
        match self {
            ActionOutcome::Invalid(state) | ActionOutcome::Failed(state) => Some(state),
            ActionOutcome::Redirect { .. } | ActionOutcome::Done => None,
        }
    }
}
