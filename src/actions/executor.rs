//! Single-statement invoice writes
//!
//! Each operation issues exactly one store call and folds any store error
//! into a [`MutationOutcome::Failure`] carrying a fixed message. The cause is
//! logged here and goes no further.

use crate::core::invoice::{InvoiceChanges, InvoiceDraft, InvoiceId, NewInvoice};
use crate::core::store::InvoiceStore;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

pub const CREATE_FAILED: &str = "database error: create failed";
pub const UPDATE_FAILED: &str = "database error: update failed";
pub const DELETE_FAILED: &str = "database error: delete failed";

/// Whether a write applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Success,
    Failure(String),
}

impl MutationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::Success)
    }
}

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Runs invoice writes against a store
#[derive(Clone)]
pub struct MutationExecutor {
    store: Arc<dyn InvoiceStore>,
    today: Clock,
}

impl MutationExecutor {
    /// Executor stamping new invoices with the current UTC date
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self {
            store,
            today: Arc::new(|| Utc::now().date_naive()),
        }
    }

    /// Replace the source of "today"
    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Arc::new(today);
        self
    }

    pub fn store(&self) -> &Arc<dyn InvoiceStore> {
        &self.store
    }

    /// Insert a new invoice dated today
    pub async fn create(&self, draft: &InvoiceDraft) -> MutationOutcome {
        let Some(amount) = draft.amount_in_minor_units() else {
            tracing::error!(amount = %draft.amount, "amount not representable in minor units");
            return MutationOutcome::Failure(CREATE_FAILED.to_string());
        };

        let invoice = NewInvoice {
            customer_id: draft.customer_id.clone(),
            amount,
            status: draft.status,
            date: (self.today)(),
        };

        match self.store.insert(invoice).await {
            Ok(id) => {
                tracing::info!(invoice_id = %id, "created invoice");
                MutationOutcome::Success
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create invoice");
                MutationOutcome::Failure(CREATE_FAILED.to_string())
            }
        }
    }

    /// Overwrite customer, amount and status; the date is never touched
    pub async fn update(&self, id: &InvoiceId, draft: &InvoiceDraft) -> MutationOutcome {
        let Some(amount) = draft.amount_in_minor_units() else {
            tracing::error!(invoice_id = %id, amount = %draft.amount, "amount not representable in minor units");
            return MutationOutcome::Failure(UPDATE_FAILED.to_string());
        };

        let changes = InvoiceChanges {
            customer_id: draft.customer_id.clone(),
            amount,
            status: draft.status,
        };

        match self.store.update(id, changes).await {
            Ok(rows) => {
                tracing::info!(invoice_id = %id, rows, "updated invoice");
                MutationOutcome::Success
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %e, "failed to update invoice");
                MutationOutcome::Failure(UPDATE_FAILED.to_string())
            }
        }
    }

    /// Delete by id; deleting nothing is still a success
    pub async fn delete(&self, id: &InvoiceId) -> MutationOutcome {
        match self.store.delete(id).await {
            Ok(rows) => {
                tracing::info!(invoice_id = %id, rows, "deleted invoice");
                MutationOutcome::Success
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %e, "failed to delete invoice");
                MutationOutcome::Failure(DELETE_FAILED.to_string())
            }
        }
    }
}
