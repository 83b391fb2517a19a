//! In-memory implementation of InvoiceStore for testing and development

use crate::core::invoice::{InvoiceChanges, InvoiceId, InvoiceRecord, NewInvoice};
use crate::core::store::InvoiceStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory invoice store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// each call takes the lock once, so every write is atomic.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<InvoiceId, InvoiceRecord>>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored invoices
    pub fn len(&self) -> usize {
        self.invoices.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let id = InvoiceId::new_v4();
        invoices.insert(id, InvoiceRecord::from_new(id, invoice));
        Ok(id)
    }

    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        match invoices.get_mut(id) {
            Some(record) => {
                record.apply(changes);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &InvoiceId) -> Result<u64> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(invoices.remove(id).map_or(0, |_| 1))
    }

    async fn get(&self, id: &InvoiceId) -> Result<Option<InvoiceRecord>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(invoices.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<InvoiceRecord>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut records: Vec<_> = invoices.values().cloned().collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::invoice::InvoiceStatus;
    use chrono::NaiveDate;

    fn new_invoice(customer: &str, day: u32) -> NewInvoice {
        NewInvoice {
            customer_id: customer.to_string(),
            amount: 999,
            status: InvoiceStatus::Paid,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryInvoiceStore::new();
        let id = store.insert(new_invoice("c1", 1)).await.unwrap();

        let record = store.get(&id).await.unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.customer_id, "c1");
        assert_eq!(record.amount, 999);
    }

    #[tokio::test]
    async fn test_update_missing_row_affects_nothing() {
        let store = InMemoryInvoiceStore::new();
        let rows = store
            .update(
                &InvoiceId::new_v4(),
                InvoiceChanges {
                    customer_id: "c1".into(),
                    amount: 1,
                    status: InvoiceStatus::Pending,
                },
            )
            .await
            .unwrap();
        assert_eq!(rows, 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_rows() {
        let store = InMemoryInvoiceStore::new();
        let id = store.insert(new_invoice("c1", 1)).await.unwrap();

        assert_eq!(store.delete(&id).await.unwrap(), 1);
        assert_eq!(store.delete(&id).await.unwrap(), 0);
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = InMemoryInvoiceStore::new();
        store.insert(new_invoice("old", 1)).await.unwrap();
        store.insert(new_invoice("new", 20)).await.unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].customer_id, "new");
        assert_eq!(records[1].customer_id, "old");
    }
}
