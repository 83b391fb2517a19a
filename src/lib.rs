//! # Invoice Dashboard
//!
//! The server side of an invoice dashboard: form submissions are validated,
//! written to a store, and followed by cache revalidation and a redirect.
//!
//! ## Features
//!
//! - **Schema validation**: every rule runs, errors are grouped by field
//! - **Mutation executor**: store failures become messages, never panics
//! - **Post-mutation effects**: revalidate the listing once, then redirect
//! - **Credentials login**: provider errors mapped to user-facing messages
//! - **Pluggable storage**: in-memory by default, PostgreSQL behind the `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dashboard::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_store(InMemoryInvoiceStore::new())
//!     .with_identity_provider(
//!         InMemoryIdentityProvider::new().with_user("user@nextmail.com", "123456"),
//!     )
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod actions;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::actions::{
        ActionOutcome, ActionState, AuthOutcome, InvoiceActions, MutationExecutor,
        MutationOutcome, PostMutationEffects, authenticate,
    };
    pub use crate::config::DashboardConfig;
    pub use crate::core::{
        AuthErrorKind, Credentials, DashboardError, DashboardEvent, EventBus, FieldErrors,
        FormFields, INVOICES_PATH, IdentityProvider, InMemoryIdentityProvider, InvoiceId,
        InvoiceRecord, InvoiceStatus, InvoiceStore, Revalidator, SignInError, ViewCache,
    };
    pub use crate::server::ServerBuilder;
    pub use crate::storage::InMemoryInvoiceStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresInvoiceStore;
}
