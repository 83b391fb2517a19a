//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresInvoiceStore`, an `InvoiceStore` backed by a
//! PostgreSQL database via `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! invoice-dashboard = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! One `invoices` table. Amounts are stored in minor units as `BIGINT`,
//! dates as `DATE`, ids are generated by the database (`gen_random_uuid()`,
//! PostgreSQL 13 or later). Every write is a single statement with bound
//! parameters.

use crate::config::DatabaseConfig;
use crate::core::invoice::{InvoiceChanges, InvoiceId, InvoiceRecord, InvoiceStatus, NewInvoice};
use crate::core::store::InvoiceStore;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Connection and schema management
// ---------------------------------------------------------------------------

/// Open a pool from database configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| anyhow!("database url is not configured (set POSTGRES_URL)"))?;

    let mut options =
        PgConnectOptions::from_str(url).context("Failed to parse database url")?;
    if config.require_ssl {
        options = options.ssl_mode(PgSslMode::Require);
    }

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .context("Failed to connect to PostgreSQL")
}

/// Apply the required table and index (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            customer_id TEXT NOT NULL,
            amount BIGINT NOT NULL,
            status VARCHAR(16) NOT NULL CHECK (status IN ('pending', 'paid')),
            date DATE NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create invoices table: {}", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_date ON invoices (date DESC)")
        .execute(pool)
        .await
        .map_err(|e| anyhow!("Failed to create invoices index: {}", e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// PostgresInvoiceStore
// ---------------------------------------------------------------------------

type InvoiceRow = (Uuid, String, i64, String, NaiveDate);

/// Invoice store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// let pool = PgPool::connect("postgres://localhost/dashboard").await?;
/// ensure_schema(&pool).await?;
/// let store = PostgresInvoiceStore::new(pool);
/// ```
#[derive(Clone, Debug)]
pub struct PostgresInvoiceStore {
    pool: PgPool,
}

impl PostgresInvoiceStore {
    /// Create a new `PostgresInvoiceStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn record_from_row((id, customer_id, amount, status, date): InvoiceRow) -> Result<InvoiceRecord> {
        let status = InvoiceStatus::from_str(&status)
            .map_err(|e| anyhow!("Invalid status in invoice {}: {}", id, e))?;
        Ok(InvoiceRecord {
            id: InvoiceId(id),
            customer_id,
            amount,
            status,
            date,
        })
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO invoices (customer_id, amount, status, date) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to insert invoice: {}", e))?;

        Ok(InvoiceId(id))
    }

    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE invoices SET customer_id = $1, amount = $2, status = $3 WHERE id = $4",
        )
        .bind(&changes.customer_id)
        .bind(changes.amount)
        .bind(changes.status.as_str())
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to update invoice: {}", e))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &InvoiceId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to delete invoice: {}", e))?;

        Ok(result.rows_affected())
    }

    async fn get(&self, id: &InvoiceId) -> Result<Option<InvoiceRecord>> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, customer_id, amount, status, date FROM invoices WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to get invoice: {}", e))?;

        row.map(Self::record_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<InvoiceRecord>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, customer_id, amount, status, date FROM invoices ORDER BY date DESC, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to list invoices: {}", e))?;

        rows.into_iter().map(Self::record_from_row).collect()
    }
}
