//! End-to-end tests of the form actions against the in-memory store
//!
//! These exercise validation, the write, and the follow-up revalidation
//! together, without HTTP in the way.

mod common;

use common::*;
use dashboard::actions::{ActionOutcome, InvoiceActions};
use dashboard::core::{FormFields, INVOICES_PATH, InvoiceId, InvoiceStatus, InvoiceStore};
use dashboard::storage::InMemoryInvoiceStore;
use std::sync::Arc;

fn setup() -> (InvoiceActions, Arc<InMemoryInvoiceStore>, Arc<RecordingRevalidator>) {
    let store = Arc::new(InMemoryInvoiceStore::new());
    let revalidator = Arc::new(RecordingRevalidator::default());
    let actions = InvoiceActions::new(store.clone(), revalidator.clone()).with_clock(fixed_day);
    (actions, store, revalidator)
}

fn form(customer: &str, amount: &str, status: &str) -> FormFields {
    FormFields::from_pairs([("customerId", customer), ("amount", amount), ("status", status)])
}

fn redirect_to_listing() -> ActionOutcome {
    ActionOutcome::Redirect {
        location: INVOICES_PATH.to_string(),
    }
}

// =============================================================================
// Create
// =============================================================================

mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_stores_one_invoice_in_minor_units() {
        let (actions, store, revalidator) = setup();

        let outcome = actions.create_invoice(&form("cust-1", "9.99", "pending")).await;

        assert_eq!(outcome, redirect_to_listing());
        let invoices = store.list().await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].customer_id, "cust-1");
        assert_eq!(invoices[0].amount, 999);
        assert_eq!(invoices[0].status, InvoiceStatus::Pending);
        assert_eq!(invoices[0].date, fixed_day());
        assert_eq!(revalidator.paths(), vec![INVOICES_PATH.to_string()]);
    }

    #[tokio::test]
    async fn test_create_keeps_every_cent_of_large_amounts() {
        let (actions, store, _) = setup();

        for (submitted, stored) in [
            ("10000000000000000.01", 1_000_000_000_000_000_001_i64),
            ("90071992547409.93", 9_007_199_254_740_993),
            ("1.005", 101),
        ] {
            let outcome = actions.create_invoice(&form(submitted, submitted, "paid")).await;
            assert_eq!(outcome, redirect_to_listing(), "amount {}", submitted);

            let invoices = store.list().await.unwrap();
            let record = invoices
                .iter()
                .find(|r| r.customer_id == submitted)
                .unwrap();
            assert_eq!(record.amount, stored, "amount {}", submitted);
        }
    }

    #[tokio::test]
    async fn test_create_rejects_amount_beyond_minor_unit_range() {
        let (actions, store, _) = setup();

        let outcome = actions
            .create_invoice(&form("cust-1", "92233720368547758.08", "paid"))
            .await;

        let state = outcome.state().cloned().unwrap();
        assert_eq!(
            state.errors.get("amount"),
            Some(&["amount is too large".to_string()][..])
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_zero_amount() {
        let (actions, store, revalidator) = setup();

        let outcome = actions.create_invoice(&form("cust-1", "0", "paid")).await;

        let ActionOutcome::Invalid(state) = outcome else {
            panic!("expected Invalid, got {:?}", outcome);
        };
        assert_eq!(
            state.errors.get("amount"),
            Some(&["amount must be greater than 0".to_string()][..])
        );
        assert_eq!(state.message.as_deref(), Some("missing fields, cannot create"));
        assert!(store.is_empty());
        assert!(revalidator.paths().is_empty());
    }

    #[tokio::test]
    async fn test_create_reports_every_field_at_once() {
        let (actions, _, _) = setup();

        let outcome = actions.create_invoice(&FormFields::new()).await;

        let state = outcome.state().cloned().unwrap();
        assert_eq!(state.errors.len(), 3);
        for field in ["customerId", "amount", "status"] {
            assert!(state.errors.contains(field), "missing error for {}", field);
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_status() {
        let (actions, store, _) = setup();

        let outcome = actions.create_invoice(&form("cust-1", "10", "overdue")).await;

        let state = outcome.state().cloned().unwrap();
        assert_eq!(
            state.errors.get("status"),
            Some(&["please select a status".to_string()][..])
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_store_failure_skips_revalidation() {
        let revalidator = Arc::new(RecordingRevalidator::default());
        let actions = InvoiceActions::new(Arc::new(FailingStore), revalidator.clone());

        let outcome = actions.create_invoice(&form("cust-1", "10", "paid")).await;

        let ActionOutcome::Failed(state) = outcome else {
            panic!("expected Failed, got {:?}", outcome);
        };
        assert_eq!(state.message.as_deref(), Some("database error: create failed"));
        assert!(state.errors.is_empty());
        assert!(revalidator.paths().is_empty());
    }
}

// =============================================================================
// Update
// =============================================================================

mod update_tests {
    use super::*;

    #[tokio::test]
    async fn test_update_keeps_id_and_date() {
        let (actions, store, revalidator) = setup();
        actions.create_invoice(&form("cust-1", "1.00", "pending")).await;
        let original = store.list().await.unwrap().remove(0);

        let outcome = actions
            .update_invoice(&original.id, &form("cust-2", "250.5", "paid"))
            .await;

        assert_eq!(outcome, redirect_to_listing());
        let updated = store.get(&original.id).await.unwrap().unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.date, original.date);
        assert_eq!(updated.customer_id, "cust-2");
        assert_eq!(updated.amount, 25050);
        assert_eq!(updated.status, InvoiceStatus::Paid);
        assert_eq!(revalidator.paths().len(), 2);
    }

    #[tokio::test]
    async fn test_update_with_same_values_changes_nothing() {
        let (actions, store, _) = setup();
        let submitted = form("cust-1", "12.30", "paid");
        actions.create_invoice(&submitted).await;
        let original = store.list().await.unwrap().remove(0);

        let outcome = actions.update_invoice(&original.id, &submitted).await;

        assert_eq!(outcome, redirect_to_listing());
        assert_eq!(store.list().await.unwrap(), vec![original]);
    }

    #[tokio::test]
    async fn test_update_invalid_form_leaves_invoice_untouched() {
        let (actions, store, _) = setup();
        actions.create_invoice(&form("cust-1", "1.00", "pending")).await;
        let original = store.list().await.unwrap().remove(0);

        let outcome = actions
            .update_invoice(&original.id, &form("", "-3", "pending"))
            .await;

        let state = outcome.state().cloned().unwrap();
        assert_eq!(state.message.as_deref(), Some("missing fields, cannot update"));
        assert_eq!(store.get(&original.id).await.unwrap().unwrap(), original);
    }

    #[tokio::test]
    async fn test_update_of_missing_invoice_still_redirects() {
        let (actions, store, revalidator) = setup();

        let outcome = actions
            .update_invoice(&InvoiceId::new_v4(), &form("cust-1", "5", "paid"))
            .await;

        assert_eq!(outcome, redirect_to_listing());
        assert!(store.is_empty());
        assert_eq!(revalidator.paths().len(), 1);
    }
}

// =============================================================================
// Delete
// =============================================================================

mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_removes_invoice_and_stays() {
        let (actions, store, revalidator) = setup();
        actions.create_invoice(&form("cust-1", "1.00", "pending")).await;
        let id = store.list().await.unwrap()[0].id;

        assert_eq!(actions.delete_invoice(&id).await, ActionOutcome::Done);
        assert!(store.is_empty());
        assert_eq!(revalidator.paths().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_of_missing_invoice_succeeds_and_revalidates() {
        let (actions, _, revalidator) = setup();

        assert_eq!(
            actions.delete_invoice(&InvoiceId::new_v4()).await,
            ActionOutcome::Done
        );
        assert_eq!(revalidator.paths(), vec![INVOICES_PATH.to_string()]);
    }

    #[tokio::test]
    async fn test_delete_store_failure_is_reported() {
        let revalidator = Arc::new(RecordingRevalidator::default());
        let actions = InvoiceActions::new(Arc::new(FailingStore), revalidator.clone());

        let outcome = actions.delete_invoice(&InvoiceId::new_v4()).await;

        let state = outcome.state().cloned().unwrap();
        assert_eq!(state.message.as_deref(), Some("database error: delete failed"));
        assert!(revalidator.paths().is_empty());
    }
}
