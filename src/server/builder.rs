//! ServerBuilder for fluent API to build the dashboard server

use super::handlers::AppState;
use super::router::{build_dashboard_routes, finish_router};
use crate::actions::InvoiceActions;
use crate::core::auth::IdentityProvider;
use crate::core::events::EventBus;
use crate::core::revalidate::ViewCache;
use crate::core::store::InvoiceStore;
use anyhow::{Result, anyhow};
use axum::Router;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::net::TcpListener;

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Builder for the dashboard HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryInvoiceStore::new())
///     .with_identity_provider(InMemoryIdentityProvider::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn InvoiceStore>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    views: Option<ViewCache>,
    event_bus: Option<EventBus>,
    login_redirect: String,
    clock: Option<Clock>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            identity: None,
            views: None,
            event_bus: None,
            login_redirect: "/dashboard".to_string(),
            clock: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the invoice store (required)
    pub fn with_store(mut self, store: impl InvoiceStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already shared invoice store (required unless `with_store` is used)
    pub fn with_shared_store(mut self, store: Arc<dyn InvoiceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the identity provider used by `/login` (required)
    pub fn with_identity_provider(mut self, provider: impl IdentityProvider + 'static) -> Self {
        self.identity = Some(Arc::new(provider));
        self
    }

    /// Use an existing view cache, e.g. to inspect it from tests
    pub fn with_view_cache(mut self, views: ViewCache) -> Self {
        self.views = Some(views);
        self
    }

    /// Publish revalidations on `bus`
    ///
    /// Ignored when a view cache is supplied with [`with_view_cache`](Self::with_view_cache);
    /// attach the bus to that cache instead.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn with_login_redirect(mut self, location: impl Into<String>) -> Self {
        self.login_redirect = location.into();
        self
    }

    /// Replace the source of "today" used to date new invoices
    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Some(Arc::new(today));
        self
    }

    /// Add custom routes to the server
    ///
    /// They are merged with the dashboard routes and share its tracing layer.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Assemble the handler state without building a router
    pub fn build_state(&self) -> Result<AppState> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow!("InvoiceStore is required. Call .with_store()"))?;
        let identity = self.identity.clone().ok_or_else(|| {
            anyhow!("IdentityProvider is required. Call .with_identity_provider()")
        })?;

        let views = match (self.views.clone(), self.event_bus.clone()) {
            (Some(views), _) => views,
            (None, Some(bus)) => ViewCache::new().with_event_bus(bus),
            (None, None) => ViewCache::new(),
        };

        let mut actions = InvoiceActions::new(store, Arc::new(views.clone()));
        if let Some(clock) = self.clock.clone() {
            actions = actions.with_clock(move || clock());
        }

        Ok(AppState {
            actions,
            identity,
            views,
            login_redirect: Arc::from(self.login_redirect.as_str()),
        })
    }

    /// Build the router
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(finish_router(build_dashboard_routes(state), custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .with_identity_provider(provider)
    ///     .serve("127.0.0.1:3000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
