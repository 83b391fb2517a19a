//! What happens after a write

use super::executor::MutationOutcome;
use super::{ActionOutcome, ActionState};
use crate::core::invoice::INVOICES_PATH;
use crate::core::revalidate::Revalidator;
use std::sync::Arc;

/// Where the caller goes once a write succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterSuccess {
    Redirect(&'static str),
    Stay,
}

/// Invalidates the invoice listing after successful writes
#[derive(Clone)]
pub struct PostMutationEffects {
    revalidator: Arc<dyn Revalidator>,
}

impl PostMutationEffects {
    pub fn new(revalidator: Arc<dyn Revalidator>) -> Self {
        Self { revalidator }
    }

    /// Turn a write result into the action's outcome.
    ///
    /// Success revalidates the listing exactly once, then redirects or stays.
    /// Failure touches nothing.
    pub fn settle(&self, outcome: MutationOutcome, then: AfterSuccess) -> ActionOutcome {
        match outcome {
            MutationOutcome::Success => {
                self.revalidator.revalidate_path(INVOICES_PATH);
                match then {
                    AfterSuccess::Redirect(location) => ActionOutcome::Redirect {
                        location: location.to_string(),
                    },
                    AfterSuccess::Stay => ActionOutcome::Done,
                }
            }
            MutationOutcome::Failure(message) => ActionOutcome::Failed(ActionState::message(message)),
        }
    }
}
