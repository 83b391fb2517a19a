//! Dashboard server entry point
//!
//! Usage: `dashboard-server [config.yaml]`

use anyhow::Result;
use dashboard::config::DashboardConfig;
use dashboard::core::{EventBus, InMemoryIdentityProvider, InvoiceStore};
use dashboard::server::ServerBuilder;
use dashboard::storage::InMemoryInvoiceStore;
use dashboard::telemetry;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1);
    let config = DashboardConfig::load(config_path.as_deref())?;

    telemetry::init(config.log_format);

    let store = open_store(&config).await?;

    let identity = config
        .dev_users
        .iter()
        .fold(InMemoryIdentityProvider::new(), |provider, user| {
            provider.with_user(&user.email, user.password.clone())
        });
    if identity.user_count() == 0 {
        tracing::warn!("No dev_users configured; every login will be rejected");
    }

    let events = EventBus::new(config.event_bus_capacity);
    telemetry::log_events(&events);

    ServerBuilder::new()
        .with_shared_store(store)
        .with_identity_provider(identity)
        .with_event_bus(events)
        .with_login_redirect(config.login_redirect.clone())
        .serve(&config.bind_address)
        .await
}

#[cfg(feature = "postgres")]
async fn open_store(config: &DashboardConfig) -> Result<Arc<dyn InvoiceStore>> {
    use dashboard::storage::{PostgresInvoiceStore, postgres};

    if config.database.url.is_none() {
        tracing::info!("No database url configured; using the in-memory store");
        return Ok(Arc::new(InMemoryInvoiceStore::new()));
    }

    let pool = postgres::connect(&config.database).await?;
    postgres::ensure_schema(&pool).await?;
    tracing::info!("Connected to PostgreSQL");
    Ok(Arc::new(PostgresInvoiceStore::new(pool)))
}

#[cfg(not(feature = "postgres"))]
async fn open_store(config: &DashboardConfig) -> Result<Arc<dyn InvoiceStore>> {
    if config.database.url.is_some() {
        tracing::warn!("Database url ignored; built without the `postgres` feature");
    }
    Ok(Arc::new(InMemoryInvoiceStore::new()))
}
