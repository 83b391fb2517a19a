//! Store trait for invoice persistence
//!
//! Every write method maps to exactly one parameterised statement. The
//! framework is agnostic to the underlying storage mechanism.

use crate::core::invoice::{InvoiceChanges, InvoiceId, InvoiceRecord, NewInvoice};
use anyhow::Result;
use async_trait::async_trait;

/// Persistence for invoice rows
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a row from four values; the store issues the id
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId>;

    /// Overwrite customer, amount and status of one row
    ///
    /// Returns the number of rows affected; zero is not an error.
    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64>;

    /// Delete one row
    ///
    /// Returns the number of rows affected; zero is not an error.
    async fn delete(&self, id: &InvoiceId) -> Result<u64>;

    /// Get a row by id
    async fn get(&self, id: &InvoiceId) -> Result<Option<InvoiceRecord>>;

    /// List all rows, newest date first
    async fn list(&self) -> Result<Vec<InvoiceRecord>>;
}
