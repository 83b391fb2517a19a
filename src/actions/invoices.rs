//! Create, update and delete invoice actions

use super::effects::{AfterSuccess, PostMutationEffects};
use super::executor::MutationExecutor;
use super::{ActionOutcome, ActionState};
use crate::core::invoice::{INVOICES_PATH, InvoiceId};
use crate::core::revalidate::Revalidator;
use crate::core::store::InvoiceStore;
use crate::core::validation::{FormFields, FormIntent, validate_invoice_form};
use chrono::NaiveDate;
use std::sync::Arc;

/// The invoice form actions
///
/// Stateless between calls; clone freely.
#[derive(Clone)]
pub struct InvoiceActions {
    executor: MutationExecutor,
    effects: PostMutationEffects,
}

impl InvoiceActions {
    pub fn new(store: Arc<dyn InvoiceStore>, revalidator: Arc<dyn Revalidator>) -> Self {
        Self {
            executor: MutationExecutor::new(store),
            effects: PostMutationEffects::new(revalidator),
        }
    }

    /// Replace the source of "today" used to date new invoices
    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.executor = self.executor.with_clock(today);
        self
    }

    pub fn store(&self) -> &Arc<dyn InvoiceStore> {
        self.executor.store()
    }

    /// Validate the form, insert the invoice, revalidate and redirect to the listing
    pub async fn create_invoice(&self, form: &FormFields) -> ActionOutcome {
        let draft = match validate_invoice_form(form, FormIntent::Create) {
            Ok(draft) => draft,
            Err(failure) => {
                tracing::debug!(fields = ?failure.errors.fields().collect::<Vec<_>>(), "create rejected");
                return ActionOutcome::Invalid(ActionState::from(failure));
            }
        };

        let outcome = self.executor.create(&draft).await;
        self.effects
            .settle(outcome, AfterSuccess::Redirect(INVOICES_PATH))
    }

    /// Validate the form, update invoice `id`, revalidate and redirect to the listing
    pub async fn update_invoice(&self, id: &InvoiceId, form: &FormFields) -> ActionOutcome {
        let draft = match validate_invoice_form(form, FormIntent::Update) {
            Ok(draft) => draft,
            Err(failure) => {
                tracing::debug!(invoice_id = %id, fields = ?failure.errors.fields().collect::<Vec<_>>(), "update rejected");
                return ActionOutcome::Invalid(ActionState::from(failure));
            }
        };

        let outcome = self.executor.update(id, &draft).await;
        self.effects
            .settle(outcome, AfterSuccess::Redirect(INVOICES_PATH))
    }

    /// Delete invoice `id` and revalidate; no redirect
    ///
    /// The id comes from a row the caller already rendered, so there is no
    /// validation step.
    pub async fn delete_invoice(&self, id: &InvoiceId) -> ActionOutcome {
        let outcome = self.executor.delete(id).await;
        self.effects.settle(outcome, AfterSuccess::Stay)
    }
}
